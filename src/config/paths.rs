use crate::constants::DEFAULT_CONFIG_FILE;
use std::path::{Path, PathBuf};

/// Returns the platform-specific path for the config file.
///
/// # Notes
/// - Uses platform-specific config directory (e.g., ~/.config on Linux)
/// - Falls back to current directory if config directory is unavailable
pub fn get_config_path() -> String {
    dirs::config_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join("retrofeed")
        .join("config.toml")
        .to_string_lossy()
        .to_string()
}

/// Returns the platform-specific path for the log directory.
pub fn get_log_dir_path() -> String {
    dirs::config_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join("retrofeed")
        .join("logs")
        .to_string_lossy()
        .to_string()
}

/// Picks the config file to load.
///
/// An explicit path always wins. Otherwise `retrofeed.toml` in the working
/// directory is used when present, then the platform config file. When neither
/// exists the working-directory name is returned so the "not found" notice
/// points at the conventional location.
pub fn resolve_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }

    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return local;
    }

    let platform = PathBuf::from(get_config_path());
    if platform.exists() {
        return platform;
    }

    local
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_path() {
        let config_path = get_config_path();
        assert!(config_path.contains("retrofeed"));
        assert!(config_path.ends_with("config.toml"));
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_config_path(Some("/tmp/somewhere/feed.toml"));
        assert_eq!(path, PathBuf::from("/tmp/somewhere/feed.toml"));
    }

    #[test]
    fn test_resolved_path_names_a_toml_file() {
        let path = resolve_config_path(None);
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("toml"));
    }
}
