//! Option handling shared by every provider: per-render format options and
//! the common initialization keys of a segment declaration.

use crate::constants::refresh::MIN_UNITS;
use crate::error::AppError;
use chrono::TimeDelta;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Per-occurrence format overrides attached to a playlist entry.
///
/// The set is open: each provider parses the keys it knows into its own
/// `#[serde(default)]` struct and ignores the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatOptions(toml::Table);

impl FormatOptions {
    pub fn new(table: toml::Table) -> Self {
        Self(table)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.0.get(key)
    }

    /// Parses the options into a provider format struct.
    ///
    /// A value of the wrong type is not fatal at render time: it is logged and
    /// the provider's defaults are used for the whole entry.
    pub fn parse<T: DeserializeOwned + Default>(&self) -> T {
        if self.0.is_empty() {
            return T::default();
        }
        match toml::Value::Table(self.0.clone()).try_into::<T>() {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Ignoring malformed format options {:?}: {}", self.0, e);
                T::default()
            }
        }
    }
}

impl From<toml::Table> for FormatOptions {
    fn from(table: toml::Table) -> Self {
        Self::new(table)
    }
}

/// Unit of the `refresh` init key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshUnit {
    Minutes,
    Hours,
}

impl RefreshUnit {
    fn interval(self, amount: f64) -> TimeDelta {
        let unit_ms = match self {
            RefreshUnit::Minutes => 60_000.0,
            RefreshUnit::Hours => 3_600_000.0,
        };
        TimeDelta::try_milliseconds((amount * unit_ms) as i64).unwrap_or(TimeDelta::MAX)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CommonOptions {
    refresh: Option<f64>,
    intro: Option<String>,
}

/// The initialization values every segment shares: refresh interval and intro text.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentInit {
    pub refresh: TimeDelta,
    pub intro: Option<String>,
}

impl SegmentInit {
    /// Resolves the common keys of a declaration against provider defaults.
    ///
    /// `refresh` may be fractional and is clamped to at least one unit. An `intro` key replaces the
    /// provider's introduction; an empty `intro` disables it.
    pub fn resolve(
        segment: &str,
        options: &toml::Table,
        default_refresh: i64,
        unit: RefreshUnit,
        default_intro: Option<&str>,
    ) -> Result<Self, AppError> {
        let common: CommonOptions = parse_init(segment, options)?;
        let amount = common
            .refresh
            .unwrap_or(default_refresh as f64)
            .max(MIN_UNITS as f64);
        let intro = match common.intro {
            Some(text) if text.trim().is_empty() => None,
            Some(text) => Some(text),
            None => default_intro.map(str::to_string),
        };
        Ok(Self {
            refresh: unit.interval(amount),
            intro,
        })
    }
}

/// Parses declaration options into a provider init struct.
///
/// Unlike format options, a mistyped init value stops startup.
pub fn parse_init<T: DeserializeOwned>(segment: &str, options: &toml::Table) -> Result<T, AppError> {
    toml::Value::Table(options.clone())
        .try_into::<T>()
        .map_err(|e| AppError::invalid_segment_options(segment, e.to_string()))
}
