use std::path::{Path, PathBuf};

pub const OPENCHAT_DIR: &str = ".openchat";
pub const CONFIG_FILE: &str = ".openchat/config.yaml";
pub const DEFAULT_LOG_FILE: &str = ".openchat/actions.log";

pub fn openchat_dir(root: &Path) -> PathBuf {
    root.join(OPENCHAT_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/chat");
        assert_eq!(openchat_dir(root), PathBuf::from("/tmp/chat/.openchat"));
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/chat/.openchat/config.yaml")
        );
    }
}
