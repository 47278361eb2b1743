use crate::error::{OpenChatError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const ACTION_NAME_KEY: &str = "actionName";
pub const PARAMETERS_KEY: &str = "parameters";
pub const RETURN_KEY: &str = "return";

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

/// The mutating receptionist operations that are written to the action log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    RegisterUser,
    Followings,
    AddPublication,
    LikePublication,
}

impl ActionKind {
    pub fn all() -> &'static [ActionKind] {
        &[
            ActionKind::RegisterUser,
            ActionKind::Followings,
            ActionKind::AddPublication,
            ActionKind::LikePublication,
        ]
    }

    /// Name written to the `actionName` field.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::RegisterUser => "registerUser",
            ActionKind::Followings => "followings",
            ActionKind::AddPublication => "addPublication",
            ActionKind::LikePublication => "likePublication",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ActionKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown action '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// ActionRecord
// ---------------------------------------------------------------------------

/// One line of the action log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    #[serde(rename = "actionName")]
    pub action_name: String,
    pub parameters: Map<String, Value>,
    #[serde(rename = "return")]
    pub returned: Map<String, Value>,
}

impl ActionRecord {
    pub fn new(
        kind: ActionKind,
        parameters: Map<String, Value>,
        returned: Map<String, Value>,
    ) -> Self {
        Self {
            action_name: kind.as_str().to_string(),
            parameters,
            returned,
        }
    }

    /// Parse one log line. `line` is the 1-based line number reported on failure.
    pub fn parse(text: &str, line: usize) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| OpenChatError::InvalidRecord {
            line,
            reason: e.to_string(),
        })
    }

    pub fn kind(&self, line: usize) -> Result<ActionKind> {
        self.action_name
            .parse()
            .map_err(|reason| OpenChatError::InvalidRecord { line, reason })
    }

    pub fn to_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn parameter_str(&self, key: &str, line: usize) -> Result<&str> {
        string_field(&self.parameters, PARAMETERS_KEY, key, line)
    }

    pub fn returned_str(&self, key: &str, line: usize) -> Result<&str> {
        string_field(&self.returned, RETURN_KEY, key, line)
    }
}

fn string_field<'a>(
    object: &'a Map<String, Value>,
    object_name: &str,
    key: &str,
    line: usize,
) -> Result<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| OpenChatError::InvalidRecord {
            line,
            reason: format!("missing string field '{object_name}.{key}'"),
        })
}

/// View a JSON value as an object, treating anything else as empty.
pub fn object_of(value: &Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
