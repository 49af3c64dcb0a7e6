use crate::error::AppError;
use serde::Deserialize;
use indexmap::IndexMap;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

pub mod display;
pub mod paths;
pub mod playlist;
pub mod validation;

pub use display::DisplaySettings;
pub use playlist::{Playlist, PlaylistEntry};

use validation::{validate_config, validate_tables};

/// Configuration for a whole feed: how it looks, which segments exist and the order they play in.
///
/// The three tables `display`, `segments` and `playlist` are required. Everything
/// else is optional and falls back to defaults.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Geometry, pacing and formatting toggles for the output engine.
    pub display: DisplaySettings,
    /// Declared segments keyed by the user-chosen name that the playlist refers to, in file order.
    pub segments: IndexMap<String, SegmentDeclaration>,
    /// Inter-entry pause and the ordered entries to cycle through.
    pub playlist: Playlist,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default)]
    pub log_file_path: Option<String>,
    /// HTTP timeout in seconds for provider fetches. Defaults to 30 seconds if not specified.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
}

/// One `[segments.<name>]` table: the provider module plus its provider-specific options.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SegmentDeclaration {
    /// Provider identifier, e.g. `us_weather`. A trailing `.py` or `.rs` is tolerated.
    pub module: String,
    /// Every other key in the table, handed to the provider untouched.
    #[serde(flatten)]
    pub options: toml::Table,
}

/// Default HTTP timeout in seconds
fn default_http_timeout() -> u64 {
    crate::constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

impl Config {
    /// Loads configuration from the given TOML file.
    ///
    /// Environment variables can override a few ambient values:
    /// - `RETROFEED_LOG_FILE` - Override log file path
    /// - `RETROFEED_HTTP_TIMEOUT` - Override HTTP timeout in seconds
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded and validated configuration
    /// * `Err(AppError)` - File could not be read, parsed or validated
    pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let content = fs::read_to_string(path).await?;
        let mut config = Self::from_toml_str(&content)?;

        if let Ok(log_file_path) = std::env::var("RETROFEED_LOG_FILE") {
            config.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var("RETROFEED_HTTP_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.http_timeout_seconds = timeout;
        }

        config.validate()?;

        info!(
            "Loaded config from {}: {} segment(s), {} playlist entries",
            path.display(),
            config.segments.len(),
            config.playlist.order.len()
        );
        Ok(config)
    }

    /// Parses configuration from TOML text.
    ///
    /// Required tables and segment modules are checked on the raw table first,
    /// so the error names every missing piece instead of the first one serde trips on.
    pub fn from_toml_str(content: &str) -> Result<Self, AppError> {
        let raw: toml::Table = toml::from_str(content)?;
        validate_tables(&raw)?;
        let config: Config = toml::Value::Table(raw).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Replaces every pacing value with near-zero timings.
    pub fn apply_fast_mode(&mut self) {
        use crate::constants::fast_mode;

        self.display.cps = fast_mode::CPS;
        self.display.newline_cps = fast_mode::NEWLINE_CPS;
        self.display.beat_seconds = fast_mode::BEAT_SECONDS;
        self.playlist.segment_pause = fast_mode::SEGMENT_PAUSE_SECONDS;
        debug!("Fast mode enabled, pacing overridden");
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }
}
