//! The `[playlist]` table and its entries

use crate::config::display::seconds;
use crate::segments::FormatOptions;
use serde::Deserialize;
use std::time::Duration;

/// Ordered entries plus the pause inserted after each one.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Playlist {
    /// Seconds to pause after each entry.
    #[serde(default = "default_segment_pause")]
    pub segment_pause: f64,
    pub order: Vec<PlaylistEntry>,
}

fn default_segment_pause() -> f64 {
    crate::constants::playlist::SEGMENT_PAUSE_SECONDS
}

impl Playlist {
    pub fn segment_pause(&self) -> Duration {
        seconds(self.segment_pause)
    }
}

/// One scheduled appearance of a named segment.
///
/// In TOML an entry is either a bare name (`"news"`) or a list whose first
/// element is the name and whose optional second element is a table of
/// format options (`["news", { headline_mode = true }]`).
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(try_from = "RawEntry")]
pub struct PlaylistEntry {
    pub name: String,
    pub format: FormatOptions,
}

impl PlaylistEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: FormatOptions::default(),
        }
    }

    pub fn with_format(name: impl Into<String>, format: FormatOptions) -> Self {
        Self {
            name: name.into(),
            format,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Name(String),
    List(Vec<toml::Value>),
}

impl TryFrom<RawEntry> for PlaylistEntry {
    type Error = String;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        let items = match raw {
            RawEntry::Name(name) => return Ok(PlaylistEntry::new(name)),
            RawEntry::List(items) => items,
        };

        let mut items = items.into_iter();
        let name = match items.next() {
            Some(toml::Value::String(name)) => name,
            Some(other) => {
                return Err(format!(
                    "playlist entry must start with a segment name, found {}",
                    other.type_str()
                ));
            }
            None => return Err("playlist entry list is empty".to_string()),
        };

        let format = match items.next() {
            None => FormatOptions::default(),
            Some(toml::Value::Table(table)) => FormatOptions::new(table),
            Some(other) => {
                return Err(format!(
                    "format options for '{name}' must be a table, found {}",
                    other.type_str()
                ));
            }
        };

        if items.next().is_some() {
            return Err(format!(
                "playlist entry for '{name}' has more than a name and a format table"
            ));
        }

        Ok(PlaylistEntry::with_format(name, format))
    }
}
