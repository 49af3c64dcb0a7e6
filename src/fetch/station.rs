//! ISS sighting opportunities from spotthestation.nasa.gov

use super::html::decode_entities;
use super::{DataSource, fetch_text};
use crate::display::clean_chars;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use tracing::debug;

static WIDGET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<div[^>]*id="widget_info"[^>]*>(.*?)</div>"#).unwrap());

static TIMESTAMP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{ts '([^']+)'\}").unwrap());

const SIGHTING_FIELDS: usize = 7;

/// One predicted pass of the station over the configured city.
#[derive(Debug, Clone, PartialEq)]
pub struct Sighting {
    pub date_time: DateTime<Local>,
    pub date_text: String,
    pub time_text: String,
    pub visible: String,
    pub max_height: String,
    pub appears: String,
    pub disappears: String,
}

/// Location triple in the site's own spelling, e.g. `United_States`.
#[derive(Debug, Clone, PartialEq)]
pub struct StationLocation {
    pub country: String,
    pub region: String,
    pub city: String,
}

impl Default for StationLocation {
    fn default() -> Self {
        Self {
            country: "United_States".to_string(),
            region: "Tennessee".to_string(),
            city: "Nashville".to_string(),
        }
    }
}

impl StationLocation {
    /// Human-readable form, e.g. "Nashville, Tennessee, United States".
    pub fn display_name(&self) -> String {
        format!("{}, {}, {}", self.city, self.region, self.country).replace('_', " ")
    }
}

/// Sightings page for one location.
#[derive(Debug, Clone)]
pub struct SpotTheStationSource {
    client: Client,
    base_url: String,
    location: StationLocation,
}

impl SpotTheStationSource {
    pub fn new(client: Client, location: StationLocation) -> Self {
        Self::with_base_url(client, crate::constants::urls::SPOT_THE_STATION, location)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>, location: StationLocation) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            location,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/sightings/view.cfm?country={}&region={}&city={}",
            self.base_url, self.location.country, self.location.region, self.location.city
        )
    }
}

#[async_trait]
impl DataSource for SpotTheStationSource {
    type Payload = Vec<Sighting>;

    fn describe(&self) -> String {
        format!("Spot the Station ({})", self.location.display_name())
    }

    async fn fetch(&self) -> Result<Vec<Sighting>, AppError> {
        let page = fetch_text(&self.client, &self.url()).await?;
        let sightings = parse_sightings(&page);
        debug!("Parsed {} sightings", sightings.len());
        Ok(sightings)
    }
}

/// Reads every well-formed sighting from the page's widget block.
///
/// A page without exactly one widget block has no usable sightings.
pub fn parse_sightings(page: &str) -> Vec<Sighting> {
    let blocks: Vec<&str> = WIDGET_REGEX
        .captures_iter(page)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();
    let [block] = blocks.as_slice() else {
        debug!("Expected one widget_info block, found {}", blocks.len());
        return Vec::new();
    };

    let text = decode_entities(block).replace("  ", " ");
    text.split('|').filter_map(parse_one_sighting).collect()
}

fn parse_one_sighting(raw: &str) -> Option<Sighting> {
    let fields: Vec<&str> = raw.split(',').collect();
    if fields.len() != SIGHTING_FIELDS {
        return None;
    }
    let degrees = |s: &str| clean_chars(&s.replace('\u{00B0}', " deg"));
    Some(Sighting {
        date_time: parse_timestamp(fields[0])?,
        date_text: clean_chars(fields[1]),
        time_text: clean_chars(fields[2]),
        visible: clean_chars(fields[3]),
        max_height: degrees(fields[4]),
        appears: degrees(fields[5]),
        disappears: degrees(fields[6]),
    })
}

/// Converts a `{ts 'YYYY-MM-DD HH:MM:SS'}` UTC stamp to local time.
fn parse_timestamp(field: &str) -> Option<DateTime<Local>> {
    let caps = TIMESTAMP_REGEX.captures(field)?;
    let raw = caps.get(1)?.as_str();
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M"))
        .ok()?;
    Some(Utc.from_utc_datetime(&naive).with_timezone(&Local))
}
