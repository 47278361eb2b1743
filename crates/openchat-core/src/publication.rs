use crate::error::{OpenChatError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Moderation
// ---------------------------------------------------------------------------

/// Words that may not appear in a publication, matched case-insensitively
/// anywhere in the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationPolicy {
    #[serde(default = "default_banned_words")]
    pub banned_words: Vec<String>,
}

fn default_banned_words() -> Vec<String> {
    vec![
        "elephant".to_string(),
        "ice cream".to_string(),
        "orange".to_string(),
    ]
}

impl Default for ModerationPolicy {
    fn default() -> Self {
        Self {
            banned_words: default_banned_words(),
        }
    }
}

impl ModerationPolicy {
    /// A policy that bans nothing.
    pub fn permissive() -> Self {
        Self {
            banned_words: Vec::new(),
        }
    }

    pub fn is_inappropriate(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.banned_words
            .iter()
            .filter(|w| !w.trim().is_empty())
            .any(|w| lower.contains(&w.to_lowercase()))
    }
}

// ---------------------------------------------------------------------------
// Publication
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub id: String,
    pub author_id: String,
    pub text: String,
    pub published_at: DateTime<Utc>,
    likers: BTreeSet<String>,
}

impl Publication {
    /// Create a publication after checking `text` against `policy`.
    pub fn made_by(
        id: impl Into<String>,
        author_id: impl Into<String>,
        text: impl Into<String>,
        published_at: DateTime<Utc>,
        policy: &ModerationPolicy,
    ) -> Result<Self> {
        let text = text.into();
        if policy.is_inappropriate(&text) {
            return Err(OpenChatError::InappropriateLanguage);
        }
        Ok(Self {
            id: id.into(),
            author_id: author_id.into(),
            text,
            published_at,
            likers: BTreeSet::new(),
        })
    }

    pub fn is_identified_as(&self, potential_id: &str) -> bool {
        self.id == potential_id
    }

    pub fn likes(&self) -> usize {
        self.likers.len()
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likers.contains(user_id)
    }

    /// Record a like. A user's repeated likes count once. Returns the new count.
    pub fn add_liker(&mut self, user_id: impl Into<String>) -> usize {
        self.likers.insert(user_id.into());
        self.likes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn appropriate_message_is_published() {
        let p = Publication::made_by("p1", "u1", "hello", at(), &ModerationPolicy::default())
            .unwrap();
        assert_eq!(p.text, "hello");
        assert_eq!(p.published_at, at());
        assert_eq!(p.likes(), 0);
    }

    #[test]
    fn every_banned_word_is_rejected_in_any_case() {
        let policy = ModerationPolicy::default();
        for text in ["elephant", "ICE CREAM", "abc Orange xx", "ELEPHANT"] {
            let err = Publication::made_by("p1", "u1", text, at(), &policy).unwrap_err();
            assert!(matches!(err, OpenChatError::InappropriateLanguage), "{text}");
        }
    }

    #[test]
    fn custom_policy_replaces_defaults() {
        let policy = ModerationPolicy {
            banned_words: vec!["spam".to_string(), "  ".to_string()],
        };
        assert!(policy.is_inappropriate("buy SPAM now"));
        assert!(!policy.is_inappropriate("elephant"));
        assert!(!policy.is_inappropriate("plain text"));
    }

    #[test]
    fn likes_count_distinct_users() {
        let mut p =
            Publication::made_by("p1", "u1", "hello", at(), &ModerationPolicy::default()).unwrap();
        assert_eq!(p.add_liker("u2"), 1);
        assert_eq!(p.add_liker("u2"), 1);
        assert_eq!(p.add_liker("u3"), 2);
        assert!(p.is_liked_by("u3"));
        assert!(!p.is_liked_by("u1"));
    }
}
