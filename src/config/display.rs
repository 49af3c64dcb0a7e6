//! Display settings for the timed output engine

use crate::constants::display as defaults;
use serde::Deserialize;
use std::time::Duration;

/// The `[display]` table. Missing keys take the classic 40-column, 20 cps defaults.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DisplaySettings {
    pub height: usize,
    /// Column width used for wrapping, headers and newline jitter.
    pub width: usize,
    /// Characters per second for regular output.
    pub cps: f64,
    /// Characters per second for the space-padded newlines.
    pub newline_cps: f64,
    /// Length of one beat, the pacing unit for busy indicators and dramatic pauses.
    pub beat_seconds: f64,
    pub force_uppercase: bool,
    /// Gates the "[Updating...]" busy indicators.
    pub verbose_updates: bool,
    #[serde(alias = "24hr_time")]
    pub prefer_24hr_time: bool,
    pub show_intros: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            height: defaults::HEIGHT,
            width: defaults::WIDTH,
            cps: defaults::CPS,
            newline_cps: defaults::NEWLINE_CPS,
            beat_seconds: defaults::BEAT_SECONDS,
            force_uppercase: true,
            verbose_updates: true,
            prefer_24hr_time: true,
            show_intros: true,
        }
    }
}

impl DisplaySettings {
    /// Delay after every printed character
    pub fn print_delay(&self) -> Duration {
        seconds(1.0 / self.cps)
    }

    /// Delay after every space of a newline
    pub fn newline_delay(&self) -> Duration {
        seconds(1.0 / self.newline_cps)
    }

    /// Length of a single beat
    pub fn beat(&self) -> Duration {
        seconds(self.beat_seconds)
    }
}

/// Converts fractional seconds, treating anything unrepresentable as no delay.
pub(crate) fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_terminal() {
        let settings = DisplaySettings::default();
        assert_eq!(settings.height, 24);
        assert_eq!(settings.width, 40);
        assert_eq!(settings.print_delay(), Duration::from_millis(50));
        assert_eq!(settings.newline_delay(), Duration::from_millis(10));
        assert_eq!(settings.beat(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_table_keeps_defaults() {
        let settings: DisplaySettings = toml::from_str("width = 64\ncps = 10").unwrap();
        assert_eq!(settings.width, 64);
        assert_eq!(settings.print_delay(), Duration::from_millis(100));
        assert!(settings.verbose_updates);
    }

    #[test]
    fn test_legacy_24hr_key_is_accepted() {
        let settings: DisplaySettings = toml::from_str("24hr_time = false").unwrap();
        assert!(!settings.prefer_24hr_time);
    }

    #[test]
    fn test_infinite_rate_means_no_delay() {
        let settings = DisplaySettings {
            cps: f64::INFINITY,
            ..DisplaySettings::default()
        };
        assert_eq!(settings.print_delay(), Duration::ZERO);
    }
}
