use crate::error::{OpenChatError, Result};
use crate::journal::record::{object_of, ActionKind, ActionRecord};
use crate::receptionist::{Receptionist, POST_ID_KEY, USER_ID_KEY};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// A [`Receptionist`] that forwards to `receptionist` and appends one
/// [`ActionRecord`] line to `sink` for every mutating call that succeeds.
///
/// The wrapped call runs first, so the record carries the real outcome
/// (minted ids, timestamps). If the append then fails the caller gets
/// [`OpenChatError::LogWrite`] although the mutation has already been applied.
/// Failed calls and read-only calls are never written.
#[derive(Debug)]
pub struct ActionRecorder<R, W> {
    receptionist: R,
    sink: W,
}

impl<R: Receptionist> ActionRecorder<R, File> {
    /// Wrap `receptionist`, appending to the log at `path` (created if missing).
    pub fn appending_to(receptionist: R, path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(receptionist, file))
    }
}

impl<R: Receptionist, W: Write> ActionRecorder<R, W> {
    pub fn new(receptionist: R, sink: W) -> Self {
        Self { receptionist, sink }
    }

    pub fn inner(&self) -> &R {
        &self.receptionist
    }

    pub fn into_parts(self) -> (R, W) {
        (self.receptionist, self.sink)
    }

    /// Run `call` against the wrapped receptionist and, if it succeeds, log it
    /// under `kind` with the parameters produced by `parameters`.
    pub fn record<C, P>(&mut self, kind: ActionKind, call: C, parameters: P) -> Result<Value>
    where
        C: FnOnce(&mut R) -> Result<Value>,
        P: FnOnce() -> Map<String, Value>,
    {
        let result = call(&mut self.receptionist)?;
        let returned = match kind {
            // Nothing to stage on replay.
            ActionKind::Followings => Map::new(),
            _ => object_of(&result),
        };
        self.append(&ActionRecord::new(kind, parameters(), returned))?;
        Ok(result)
    }

    fn append(&mut self, record: &ActionRecord) -> Result<()> {
        let mut line = record.to_line()?;
        // One write per record so a failing sink never leaves half a line.
        line.push('\n');
        self.sink
            .write_all(line.as_bytes())
            .and_then(|()| self.sink.flush())
            .map_err(|e| {
                tracing::warn!(action = %record.action_name, error = %e, "action log append failed");
                OpenChatError::LogWrite(e)
            })?;
        tracing::debug!(action = %record.action_name, "appended action record");
        Ok(())
    }
}

fn with_field(body: &Value, key: &str, value: &str) -> Map<String, Value> {
    let mut parameters = object_of(body);
    parameters.insert(key.to_string(), Value::String(value.to_string()));
    parameters
}

impl<R: Receptionist, W: Write> Receptionist for ActionRecorder<R, W> {
    fn register_user(&mut self, registration: &Value) -> Result<Value> {
        self.record(
            ActionKind::RegisterUser,
            |r| r.register_user(registration),
            || object_of(registration),
        )
    }

    fn login(&self, credentials: &Value) -> Result<Value> {
        self.receptionist.login(credentials)
    }

    fn users(&self) -> Result<Value> {
        self.receptionist.users()
    }

    fn followings(&mut self, following: &Value) -> Result<Value> {
        self.record(
            ActionKind::Followings,
            |r| r.followings(following),
            || object_of(following),
        )
    }

    fn followees(&self, follower_id: &str) -> Result<Value> {
        self.receptionist.followees(follower_id)
    }

    fn add_publication(&mut self, user_id: &str, message: &Value) -> Result<Value> {
        self.record(
            ActionKind::AddPublication,
            |r| r.add_publication(user_id, message),
            || with_field(message, USER_ID_KEY, user_id),
        )
    }

    fn timeline(&self, user_id: &str) -> Result<Value> {
        self.receptionist.timeline(user_id)
    }

    fn wall(&self, user_id: &str) -> Result<Value> {
        self.receptionist.wall(user_id)
    }

    fn like_publication(&mut self, publication_id: &str, liker: &Value) -> Result<Value> {
        self.record(
            ActionKind::LikePublication,
            |r| r.like_publication(publication_id, liker),
            || with_field(liker, POST_ID_KEY, publication_id),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receptionist::JsonReceptionist;
    use crate::system::OpenChatSystem;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::cell::Cell;
    use std::io;

    fn receptionist() -> JsonReceptionist {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap();
        let seq = Cell::new(0u32);
        JsonReceptionist::new(OpenChatSystem::new(
            Box::new(move || at),
            Box::new(move || {
                seq.set(seq.get() + 1);
                format!("id-{}", seq.get())
            }),
        ))
    }

    fn recorder() -> ActionRecorder<JsonReceptionist, Vec<u8>> {
        ActionRecorder::new(receptionist(), Vec::new())
    }

    fn lines(recorder: ActionRecorder<JsonReceptionist, Vec<u8>>) -> Vec<Value> {
        let (_, sink) = recorder.into_parts();
        String::from_utf8(sink)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn register(r: &mut impl Receptionist, name: &str) -> String {
        r.register_user(&json!({ "username": name, "password": "pw", "about": "" }))
            .unwrap()["id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Accepts whole buffers except on the `fail_on`-th call to `write`.
    struct FlakySink {
        written: Vec<u8>,
        calls: usize,
        fail_on: usize,
    }

    impl Write for FlakySink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls == self.fail_on {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn register_user_is_logged_with_its_result() {
        let mut r = recorder();
        let response = r
            .register_user(&json!({ "username": "pepe", "password": "pw", "about": "hi" }))
            .unwrap();
        assert_eq!(response["id"], "id-1");

        let logged = lines(r);
        assert_eq!(
            logged,
            vec![json!({
                "actionName": "registerUser",
                "parameters": { "username": "pepe", "password": "pw", "about": "hi" },
                "return": { "id": "id-1", "username": "pepe", "about": "hi" },
            })]
        );
    }

    #[test]
    fn add_publication_injects_user_id() {
        let mut r = recorder();
        let pepe = register(&mut r, "pepe");
        r.add_publication(&pepe, &json!({ "text": "hello" })).unwrap();

        let logged = lines(r);
        assert_eq!(logged[1]["actionName"], "addPublication");
        assert_eq!(logged[1]["parameters"], json!({ "text": "hello", "userId": "id-1" }));
        assert_eq!(logged[1]["return"]["postId"], "id-2");
        assert_eq!(logged[1]["return"]["dateTime"], "2024-03-01T10:15:30Z");
    }

    #[test]
    fn like_publication_injects_post_id() {
        let mut r = recorder();
        let pepe = register(&mut r, "pepe");
        let post = r.add_publication(&pepe, &json!({ "text": "hello" })).unwrap();
        let post_id = post["postId"].as_str().unwrap().to_string();
        r.like_publication(&post_id, &json!({ "userId": pepe })).unwrap();

        let logged = lines(r);
        assert_eq!(logged[2]["actionName"], "likePublication");
        assert_eq!(logged[2]["parameters"], json!({ "userId": "id-1", "postId": "id-2" }));
        assert_eq!(logged[2]["return"], json!({ "likes": 1 }));
    }

    #[test]
    fn followings_logs_empty_return() {
        let mut r = recorder();
        let pepe = register(&mut r, "pepe");
        let juan = register(&mut r, "juan");
        r.followings(&json!({ "followerId": pepe, "followeeId": juan })).unwrap();

        let logged = lines(r);
        assert_eq!(logged.len(), 3);
        assert_eq!(logged[2]["actionName"], "followings");
        assert_eq!(logged[2]["return"], json!({}));
    }

    #[test]
    fn read_only_calls_pass_through_unlogged() {
        let mut r = recorder();
        let pepe = register(&mut r, "pepe");
        let direct = r.inner().timeline(&pepe).unwrap();

        assert_eq!(r.timeline(&pepe).unwrap(), direct);
        assert_eq!(r.wall(&pepe).unwrap(), json!([]));
        assert_eq!(r.users().unwrap()[0]["username"], "pepe");
        assert_eq!(r.followees(&pepe).unwrap(), json!([]));
        assert_eq!(
            r.login(&json!({ "username": "pepe", "password": "pw" })).unwrap()["id"],
            "id-1"
        );

        assert_eq!(lines(r).len(), 1);
    }

    #[test]
    fn domain_failure_is_returned_and_not_logged() {
        let mut r = recorder();
        register(&mut r, "pepe");
        let err = r
            .register_user(&json!({ "username": "pepe", "password": "pw" }))
            .unwrap_err();
        assert!(matches!(err, OpenChatError::UserAlreadyRegistered(_)));

        let err = r
            .add_publication("id-1", &json!({ "text": "elephant" }))
            .unwrap_err();
        assert!(matches!(err, OpenChatError::InappropriateLanguage));

        assert_eq!(lines(r).len(), 1);
    }

    #[test]
    fn sink_failure_surfaces_after_mutation() {
        let mut r = ActionRecorder::new(receptionist(), BrokenSink);
        let err = r
            .register_user(&json!({ "username": "pepe", "password": "pw" }))
            .unwrap_err();
        assert!(matches!(err, OpenChatError::LogWrite(_)));

        // The registration itself went through.
        assert!(r.inner().system().has_user_named("pepe"));
    }

    #[test]
    fn failed_append_leaves_no_partial_line() {
        let sink = FlakySink {
            written: Vec::new(),
            calls: 0,
            fail_on: 2,
        };
        let mut r = ActionRecorder::new(receptionist(), sink);
        let mut failures = 0;
        for name in ["pepe", "juan", "ana"] {
            match r.register_user(&json!({ "username": name, "password": "pw" })) {
                Ok(_) => {}
                Err(OpenChatError::LogWrite(_)) => failures += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(failures, 1);

        let (_, sink) = r.into_parts();
        let content = String::from_utf8(sink.written).unwrap();
        assert!(content.ends_with('\n'));
        assert_eq!(content.lines().count(), 2);
        for line in content.lines() {
            serde_json::from_str::<Value>(line).unwrap();
        }

        let replayed = crate::journal::load_from(content.as_bytes()).unwrap();
        assert_eq!(replayed.system().number_of_users(), 2);
    }

    #[test]
    fn appending_to_file_keeps_existing_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logs/actions.log");

        let mut r = ActionRecorder::appending_to(receptionist(), &path).unwrap();
        register(&mut r, "pepe");
        drop(r);

        let mut r = ActionRecorder::appending_to(receptionist(), &path).unwrap();
        register(&mut r, "juan");
        drop(r);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.ends_with('\n'));
    }
}
