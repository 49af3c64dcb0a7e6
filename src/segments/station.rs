//! Upcoming International Space Station sightings

use super::{
    FormatOptions, RefreshUnit, Segment, SegmentContext, SegmentInit, StalenessCache, Timestamped,
    fetch_or_sentinel, options::parse_init,
};
use crate::constants::refresh::STATION_HOURS;
use crate::display::TimedWriter;
use crate::error::AppError;
use crate::fetch::DataSource;
use crate::fetch::station::{Sighting, SpotTheStationSource, StationLocation};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta};
use serde::Deserialize;

const INTRO: &str = "ISS Sightings provided by spotthestation.nasa.gov";

/// Sightings that started less than this long ago are still shown.
const GRACE_MINUTES: i64 = 5;

#[derive(Debug, Clone)]
pub struct StationData {
    pub fetched_at: DateTime<Local>,
    pub sightings: Vec<Sighting>,
}

impl Timestamped for StationData {
    fn fetched_at(&self) -> DateTime<Local> {
        self.fetched_at
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StationInit {
    country: Option<String>,
    region: Option<String>,
    city: Option<String>,
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct StationFormat {
    max_sightings: i64,
}

impl Default for StationFormat {
    fn default() -> Self {
        Self { max_sightings: 3 }
    }
}

/// Sightings still worth announcing at `now`, at most `max`.
pub fn upcoming(sightings: &[Sighting], now: DateTime<Local>, max: usize) -> Vec<&Sighting> {
    let cutoff = now - TimeDelta::minutes(GRACE_MINUTES);
    sightings
        .iter()
        .filter(|s| s.date_time >= cutoff)
        .take(max)
        .collect()
}

pub struct StationSegment<S = SpotTheStationSource> {
    name: String,
    intro: Option<String>,
    location: String,
    source: S,
    cache: StalenessCache<StationData>,
}

impl StationSegment<SpotTheStationSource> {
    pub fn from_context(ctx: &SegmentContext<'_>) -> Result<Self, AppError> {
        let init = SegmentInit::resolve(
            ctx.name,
            ctx.options,
            STATION_HOURS,
            RefreshUnit::Hours,
            Some(INTRO),
        )?;
        let station: StationInit = parse_init(ctx.name, ctx.options)?;
        let place = match (station.country, station.region, station.city) {
            (Some(country), Some(region), Some(city)) => StationLocation {
                country,
                region,
                city,
            },
            _ => StationLocation::default(),
        };
        let location = station
            .location
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| place.display_name());
        let source = SpotTheStationSource::new(ctx.client.clone(), place);
        Ok(Self::with_source(ctx.name, init, location, source))
    }
}

impl<S: DataSource<Payload = Vec<Sighting>>> StationSegment<S> {
    pub fn with_source(name: &str, init: SegmentInit, location: String, source: S) -> Self {
        Self {
            name: name.to_string(),
            intro: init.intro,
            location,
            source,
            cache: StalenessCache::new(init.refresh),
        }
    }
}

#[async_trait]
impl<S: DataSource<Payload = Vec<Sighting>>> Segment for StationSegment<S> {
    fn introduction(&self) -> Option<&str> {
        self.intro.as_deref()
    }

    fn is_stale(&self) -> bool {
        self.cache.is_stale()
    }

    fn update_message(&self) -> &str {
        "Updating Station Data"
    }

    async fn refresh(&mut self) {
        let sightings = fetch_or_sentinel(&self.name, &self.source, Vec::new).await;
        self.cache.store(StationData {
            fetched_at: Local::now(),
            sightings,
        });
    }

    async fn show(&mut self, out: &mut TimedWriter, format: &FormatOptions) {
        let format: StationFormat = format.parse();
        out.header_with("Spot the Station", ">", "<").await;
        out.newline().await;
        let Some(data) = self.cache.payload() else {
            return;
        };
        if data.sightings.is_empty() {
            out.write("No ISS Sightings Available").await;
            return;
        }

        out.write(&self.location).await;
        out.write("Upcoming ISS Sightings:").await;
        let shown = upcoming(
            &data.sightings,
            Local::now(),
            format.max_sightings.max(0) as usize,
        );
        if shown.is_empty() {
            out.newline().await;
            out.write("No Future Sightings Available").await;
            return;
        }
        let beat = out.beat();
        for sighting in shown {
            out.newline_with_pause(beat).await;
            out.write(&format!("    {} @ {}", sighting.date_text, sighting.time_text))
                .await;
            out.write(&format!("      Visible for {}", sighting.visible))
                .await;
            out.write(&format!("      Max height {}", sighting.max_height))
                .await;
            out.write(&format!("      From {}", sighting.appears)).await;
            out.write(&format!("      To   {}", sighting.disappears)).await;
        }
    }
}
