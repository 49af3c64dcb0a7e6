//! Application-wide constants and configuration values
//!
//! This module centralizes the magic numbers shared by the display engine,
//! the configuration layer and the segment providers.

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of idle connections kept per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 8;

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "retrofeed.toml";

/// Name of the log file inside the log directory
pub const LOG_FILE_NAME: &str = "retrofeed.log";

/// Placeholder shown for any field a provider could not fetch or parse
pub const NOT_AVAILABLE: &str = "N/A";

/// Display defaults used when a key is missing from the `[display]` table
pub mod display {
    pub const HEIGHT: usize = 24;
    pub const WIDTH: usize = 40;
    pub const CPS: f64 = 20.0;
    pub const NEWLINE_CPS: f64 = 100.0;
    pub const BEAT_SECONDS: f64 = 1.0;
}

/// Pacing used by `--fast`, for checking playlist order by eye
pub mod fast_mode {
    pub const CPS: f64 = 1000.0;
    pub const NEWLINE_CPS: f64 = 1000.0;
    pub const BEAT_SECONDS: f64 = 0.1;
    pub const SEGMENT_PAUSE_SECONDS: f64 = 1.0;
}

/// Playlist defaults
pub mod playlist {
    /// Pause between playlist entries when `segment_pause` is omitted
    pub const SEGMENT_PAUSE_SECONDS: f64 = 6.0;
}

/// Refresh intervals, in minutes unless stated otherwise
pub mod refresh {
    /// No refresh interval may be shorter than one cycle unit
    pub const MIN_UNITS: i64 = 1;
    pub const DEFAULT_MINUTES: i64 = 60;
    pub const WEATHER_MINUTES: i64 = 20;
    pub const NEWS_MINUTES: i64 = 30;
    pub const FINANCE_MINUTES: i64 = 15;
    /// Station sightings are configured in hours
    pub const STATION_HOURS: i64 = 24;

    /// Weather is always stale once the upstream observation is older than this
    pub const WEATHER_OBSERVATION_MAX_AGE_MINUTES: i64 = 62;
}

/// Upstream endpoints for the built-in providers
pub mod urls {
    pub const WEATHER_GOV: &str = "https://forecast.weather.gov";
    pub const AP_NEWS: &str = "https://apnews.com";
    pub const YAHOO_FINANCE: &str = "https://query1.finance.yahoo.com";
    pub const SPOT_THE_STATION: &str = "https://spotthestation.nasa.gov";
    pub const WIKIPEDIA: &str = "https://en.wikipedia.org";
}
