use crate::clock::parse_timestamp;
use crate::error::{OpenChatError, Result};
use crate::journal::record::{ActionKind, ActionRecord};
use crate::journal::staging::Staging;
use crate::publication::ModerationPolicy;
use crate::receptionist::{
    JsonReceptionist, Receptionist, DATE_TIME_KEY, ID_KEY, POST_ID_KEY, USER_ID_KEY,
};
use crate::system::OpenChatSystem;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Rebuilds a [`JsonReceptionist`] from an action log.
///
/// Lines are replayed strictly in order against a fresh system whose clock and
/// id generator read from a [`Staging`] owned by this load. Before each record
/// that mints an id or reads the clock, the value recorded in its `return`
/// object is staged, so the rebuilt state carries the original ids and
/// timestamps. Any bad line aborts the whole load.
///
/// Logged publications were moderated when they were first made, so replay
/// bans nothing. The configured policy only applies to live calls on the
/// rebuilt receptionist.
#[derive(Debug, Clone, Default)]
pub struct ReplayLoader {
    moderation: ModerationPolicy,
}

/// Outcome of a successful load.
#[derive(Debug)]
pub struct Replay {
    pub receptionist: JsonReceptionist,
    /// Number of records replayed, not counting trailing blank lines.
    pub records: usize,
}

/// Replay `reader` with the default moderation policy.
pub fn load_from<B: BufRead>(reader: B) -> Result<JsonReceptionist> {
    ReplayLoader::default().load(reader)
}

impl ReplayLoader {
    pub fn new(moderation: ModerationPolicy) -> Self {
        Self { moderation }
    }

    pub fn load_file(&self, path: &Path) -> Result<JsonReceptionist> {
        Ok(self.replay_file(path)?.receptionist)
    }

    pub fn load<B: BufRead>(&self, reader: B) -> Result<JsonReceptionist> {
        Ok(self.replay(reader)?.receptionist)
    }

    pub fn replay_file(&self, path: &Path) -> Result<Replay> {
        let file = File::open(path)?;
        self.replay(BufReader::new(file))
    }

    pub fn replay<B: BufRead>(&self, reader: B) -> Result<Replay> {
        let staging = Staging::new();
        let mut receptionist = JsonReceptionist::new(OpenChatSystem::with_moderation(
            Box::new(staging.clock()),
            Box::new(staging.ids()),
            ModerationPolicy::permissive(),
        ));

        let mut records = 0usize;
        let mut first_blank: Option<usize> = None;
        for (index, bytes) in reader.split(b'\n').enumerate() {
            let line = index + 1;
            let text = line_text(bytes?, line)?;
            if text.trim().is_empty() {
                first_blank.get_or_insert(line);
                continue;
            }
            // Blank lines are only allowed as trailing padding.
            if let Some(blank) = first_blank {
                return Err(OpenChatError::InvalidRecord {
                    line: blank,
                    reason: "blank line inside the log".to_string(),
                });
            }
            let record = ActionRecord::parse(&text, line)?;
            replay_record(&mut receptionist, &staging, &record, line)?;
            records += 1;
        }

        // Later calls on the rebuilt receptionist are live ones.
        staging.clear();
        receptionist.system_mut().set_moderation(self.moderation.clone());
        tracing::info!(records, "action log replayed");
        Ok(Replay {
            receptionist,
            records,
        })
    }
}

fn line_text(mut bytes: Vec<u8>, line: usize) -> Result<String> {
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
    String::from_utf8(bytes).map_err(|e| OpenChatError::InvalidRecord {
        line,
        reason: e.to_string(),
    })
}

fn replay_record(
    receptionist: &mut JsonReceptionist,
    staging: &Staging,
    record: &ActionRecord,
    line: usize,
) -> Result<()> {
    let kind = record.kind(line)?;
    let parameters = Value::Object(record.parameters.clone());

    let outcome = match kind {
        ActionKind::RegisterUser => {
            staging.stage_id(record.returned_str(ID_KEY, line)?);
            receptionist.register_user(&parameters)
        }
        ActionKind::Followings => receptionist.followings(&parameters),
        ActionKind::AddPublication => {
            let user_id = record.parameter_str(USER_ID_KEY, line)?;
            let post_id = record.returned_str(POST_ID_KEY, line)?;
            let date_time = record.returned_str(DATE_TIME_KEY, line)?;
            let published_at =
                parse_timestamp(date_time).ok_or_else(|| OpenChatError::InvalidRecord {
                    line,
                    reason: format!("unparseable return.{DATE_TIME_KEY} '{date_time}'"),
                })?;
            staging.stage_id(post_id);
            staging.stage_now(published_at);
            receptionist.add_publication(user_id, &parameters)
        }
        ActionKind::LikePublication => {
            let post_id = record.parameter_str(POST_ID_KEY, line)?;
            receptionist.like_publication(post_id, &parameters)
        }
    };

    outcome.map_err(|source| OpenChatError::ReplayRejected {
        line,
        source: Box::new(source),
    })?;
    tracing::debug!(line, action = %kind, "replayed action record");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
