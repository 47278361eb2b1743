use crate::error::{OpenChatError, Result};
use crate::paths;
use crate::publication::ModerationPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// LogConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Action log location, relative to the project root unless absolute.
    #[serde(default = "default_log_path")]
    pub path: PathBuf,
}

fn default_log_path() -> PathBuf {
    PathBuf::from(paths::DEFAULT_LOG_FILE)
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: default_log_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub moderation: ModerationPolicy,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            version: 1,
            log: LogConfig::default(),
            moderation: ModerationPolicy::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(OpenChatError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Absolute location of the action log for a project rooted at `root`.
    pub fn log_path(&self, root: &Path) -> PathBuf {
        if self.log.path.is_absolute() {
            self.log.path.clone()
        } else {
            root.join(&self.log.path)
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.log.path.as_os_str().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "log.path is empty".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for word in &self.moderation.banned_words {
            if word.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: "moderation.banned_words contains a blank entry".to_string(),
                });
            } else if !seen.insert(word.to_lowercase()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("banned word '{}' is listed more than once", word),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let dir = TempDir::new().unwrap();
        Config::new().save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.log.path, PathBuf::from(".openchat/actions.log"));
        assert_eq!(loaded.moderation, ModerationPolicy::default());
    }

    #[test]
    fn load_without_file_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err, OpenChatError::NotInitialized));
    }

    #[test]
    fn missing_sections_use_defaults() {
        let cfg: Config = serde_yaml::from_str("version: 1\n").unwrap();
        assert_eq!(cfg.log.path, PathBuf::from(".openchat/actions.log"));
        assert_eq!(cfg.moderation.banned_words.len(), 3);
    }

    #[test]
    fn log_path_resolves_against_root() {
        let mut cfg = Config::new();
        assert_eq!(
            cfg.log_path(Path::new("/srv/chat")),
            PathBuf::from("/srv/chat/.openchat/actions.log")
        );
        cfg.log.path = PathBuf::from("/var/log/chat.log");
        assert_eq!(
            cfg.log_path(Path::new("/srv/chat")),
            PathBuf::from("/var/log/chat.log")
        );
    }

    #[test]
    fn default_config_has_no_warnings() {
        assert!(Config::new().validate().is_empty());
    }

    #[test]
    fn validate_flags_empty_log_and_bad_words() {
        let cfg: Config = serde_yaml::from_str(
            "log:\n  path: ''\nmoderation:\n  banned_words: [spam, ' ', SPAM]\n",
        )
        .unwrap();
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 3);
        assert_eq!(warnings[0].level, WarnLevel::Error);
        assert!(warnings[1].message.contains("blank"));
        assert!(warnings[2].message.contains("SPAM"));
    }
}
