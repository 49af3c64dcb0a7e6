//! US weather: current conditions, hazards and the period forecast

use super::{
    FormatOptions, RefreshUnit, Segment, SegmentContext, SegmentInit, StalenessCache, Timestamped,
    fetch_or_sentinel, options::parse_init,
};
use crate::constants::refresh::{WEATHER_MINUTES, WEATHER_OBSERVATION_MAX_AGE_MINUTES};
use crate::display::TimedWriter;
use crate::error::AppError;
use crate::fetch::DataSource;
use crate::fetch::weather::{WeatherGovSource, WeatherReport};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta};
use serde::Deserialize;

const INTRO: &str = "Weather provided by weather.gov";
const DEFAULT_LAT: f64 = 36.116453;
const DEFAULT_LON: f64 = -86.675228;
const DEFAULT_LOCATION: &str = "Default Location (BNA)";
const MAX_FORECAST_PERIODS: i64 = 15;

#[derive(Debug, Clone)]
pub struct WeatherData {
    pub fetched_at: DateTime<Local>,
    pub report: WeatherReport,
}

impl Timestamped for WeatherData {
    fn fetched_at(&self) -> DateTime<Local> {
        self.fetched_at
    }
}

impl WeatherData {
    /// Whether the upstream observation itself is older than the service's hourly cycle.
    fn observation_is_old(&self, now: DateTime<Local>) -> bool {
        self.report.last_update_at.is_some_and(|observed| {
            now.signed_duration_since(observed)
                >= TimeDelta::minutes(WEATHER_OBSERVATION_MAX_AGE_MINUTES)
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WeatherInit {
    lat: Option<f64>,
    lon: Option<f64>,
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct WeatherFormat {
    forecast_periods: i64,
}

impl Default for WeatherFormat {
    fn default() -> Self {
        Self { forecast_periods: 5 }
    }
}

/// Number of forecast periods to show: the request clamped to 0..=15, then to what is available.
pub fn periods_to_show(requested: i64, available: usize) -> usize {
    let clamped = requested.clamp(0, MAX_FORECAST_PERIODS) as usize;
    clamped.min(available)
}

pub struct WeatherSegment<S = WeatherGovSource> {
    name: String,
    intro: Option<String>,
    location: Option<String>,
    source: S,
    cache: StalenessCache<WeatherData>,
}

impl WeatherSegment<WeatherGovSource> {
    pub fn from_context(ctx: &SegmentContext<'_>) -> Result<Self, AppError> {
        let init = SegmentInit::resolve(
            ctx.name,
            ctx.options,
            WEATHER_MINUTES,
            RefreshUnit::Minutes,
            Some(INTRO),
        )?;
        let weather: WeatherInit = parse_init(ctx.name, ctx.options)?;
        let (lat, lon, location) = match (weather.lat, weather.lon) {
            (Some(lat), Some(lon)) => (lat, lon, weather.location),
            _ => (DEFAULT_LAT, DEFAULT_LON, Some(DEFAULT_LOCATION.to_string())),
        };
        let source = WeatherGovSource::new(ctx.client.clone(), lat, lon);
        Ok(Self::with_source(ctx.name, init, location, source))
    }
}

impl<S: DataSource<Payload = WeatherReport>> WeatherSegment<S> {
    pub fn with_source(name: &str, init: SegmentInit, location: Option<String>, source: S) -> Self {
        Self {
            name: name.to_string(),
            intro: init.intro,
            location: location.filter(|l| !l.trim().is_empty()),
            source,
            cache: StalenessCache::new(init.refresh),
        }
    }

    pub fn data(&self) -> Option<&WeatherData> {
        self.cache.payload()
    }

    fn is_stale_at(&self, now: DateTime<Local>) -> bool {
        self.cache
            .is_stale_or(now, |data, now| data.observation_is_old(now))
    }
}

#[async_trait]
impl<S: DataSource<Payload = WeatherReport>> Segment for WeatherSegment<S> {
    fn introduction(&self) -> Option<&str> {
        self.intro.as_deref()
    }

    fn is_stale(&self) -> bool {
        self.is_stale_at(Local::now())
    }

    fn update_message(&self) -> &str {
        "Checking for Weather Updates"
    }

    async fn refresh(&mut self) {
        let report = fetch_or_sentinel(&self.name, &self.source, WeatherReport::unavailable).await;
        self.cache.store(WeatherData {
            fetched_at: Local::now(),
            report,
        });
    }

    async fn show(&mut self, out: &mut TimedWriter, format: &FormatOptions) {
        let format: WeatherFormat = format.parse();
        let Some(data) = self.cache.payload() else {
            return;
        };
        let report = &data.report;
        let location = self
            .location
            .as_deref()
            .unwrap_or(report.conditions_location.as_str());

        out.write(&format!("Weather at {location}")).await;
        out.write(&format!("As of {}", report.last_update)).await;

        for hazard in &report.hazards {
            out.newline().await;
            out.write(&format!("!!! {hazard}")).await;
        }

        out.newline().await;
        out.write(&format!("    Conditions   {}", report.currently)).await;
        out.write(&format!("    Temperature  {} ({})", report.temp_f, report.temp_c))
            .await;
        out.write(&format!("    Wind         {}", report.wind_speed)).await;
        out.write(&format!("    Visibility   {}", report.visibility)).await;
        out.write(&format!("    Dewpoint     {} {}", report.dewpoint, report.comfort).trim_end())
            .await;

        let periods = periods_to_show(format.forecast_periods, report.periods.len());
        if periods == 0 {
            return;
        }
        let beat = out.beat();
        out.newline_with_pause(beat).await;
        if periods > 1 {
            out.newline().await;
            out.header("Extended Forecast", "*").await;
        }
        for period in &report.periods[..periods] {
            out.newline_with_pause(beat).await;
            if periods > 1 {
                out.write(&period.timeframe).await;
            }
            if !period.forecast.is_empty() {
                out.write(&period.forecast).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::weather::ForecastPeriod;
    use crate::testing_utils::{MockSource, buffered_writer, instant_settings};
    use chrono::FixedOffset;

    fn init() -> SegmentInit {
        SegmentInit {
            refresh: TimeDelta::minutes(20),
            intro: Some(INTRO.to_string()),
        }
    }

    fn report(periods: usize, observed: Option<DateTime<FixedOffset>>) -> WeatherReport {
        WeatherReport {
            conditions_location: "Nashville Airport".to_string(),
            currently: "Fair".to_string(),
            temp_f: "72F".to_string(),
            temp_c: "22C".to_string(),
            humidity: "55%".to_string(),
            barometer: "30.12 in".to_string(),
            wind_speed: "S 8 mph".to_string(),
            visibility: "10.00 mi".to_string(),
            dewpoint: "55F (13C)".to_string(),
            comfort: "Pleasant".to_string(),
            last_update: "19 Oct 2:53 pm CDT".to_string(),
            last_update_at: observed,
            periods: (0..periods)
                .map(|i| ForecastPeriod {
                    timeframe: format!("Period {i}"),
                    forecast: format!("Forecast {i}"),
                })
                .collect(),
            hazards: vec!["Wind Advisory".to_string()],
        }
    }

    #[test]
    fn test_periods_to_show() {
        assert_eq!(periods_to_show(5, 3), 3);
        assert_eq!(periods_to_show(5, 14), 5);
        assert_eq!(periods_to_show(-2, 14), 0);
        assert_eq!(periods_to_show(40, 20), 15);
    }

    #[tokio::test]
    async fn test_render_full_report() {
        let (mut out, buffer) = buffered_writer(instant_settings());
        let source = MockSource::new([Some(report(3, None))]);
        let mut segment = WeatherSegment::with_source("wx", init(), None, source.clone());

        segment.render(&mut out, &FormatOptions::default()).await;

        let lines = buffer.lines();
        assert_eq!(lines[0], "[CHECKING FOR WEATHER UPDATES...]");
        assert_eq!(lines[1], "WEATHER AT NASHVILLE AIRPORT");
        assert!(lines.contains(&"!!! WIND ADVISORY".to_string()));
        assert!(lines.contains(&"    DEWPOINT     55F (13C) PLEASANT".to_string()));
        assert!(lines.iter().any(|l| l.contains("EXTENDED FORECAST")));
        // five requested, three available
        assert_eq!(lines.iter().filter(|l| l.starts_with("FORECAST ")).count(), 3);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_single_period_has_no_header() {
        let (mut out, buffer) = buffered_writer(instant_settings());
        let source = MockSource::new([Some(report(4, None))]);
        let mut segment =
            WeatherSegment::with_source("wx", init(), Some("Home".to_string()), source);
        let format = FormatOptions::new(toml::from_str("forecast_periods = 1").unwrap());

        segment.render(&mut out, &format).await;

        let lines = buffer.lines();
        assert!(lines.contains(&"WEATHER AT HOME".to_string()));
        assert!(!lines.iter().any(|l| l.contains("EXTENDED FORECAST")));
        assert!(!lines.iter().any(|l| l.starts_with("PERIOD ")));
        assert_eq!(lines.last().map(String::as_str), Some("FORECAST 0"));
    }

    #[tokio::test]
    async fn test_fetch_failure_renders_sentinel() {
        let (mut out, buffer) = buffered_writer(instant_settings());
        let mut segment =
            WeatherSegment::with_source("wx", init(), None, MockSource::<WeatherReport>::failing());

        segment.render(&mut out, &FormatOptions::default()).await;

        let lines = buffer.lines();
        assert!(lines.contains(&"WEATHER AT N/A".to_string()));
        assert!(lines.contains(&"    CONDITIONS   N/A".to_string()));
        assert!(lines.contains(&"FORECAST NOT AVAILABLE".to_string()));
        assert!(segment.data().is_some());
        assert!(!segment.is_stale());
    }

    #[tokio::test]
    async fn test_old_observation_forces_refresh() {
        let observed = (Local::now() - TimeDelta::minutes(70)).fixed_offset();
        let source = MockSource::new([Some(report(1, Some(observed))), Some(report(1, None))]);
        let (mut out, _buffer) = buffered_writer(instant_settings());
        let mut segment = WeatherSegment::with_source("wx", init(), None, source.clone());

        segment.render(&mut out, &FormatOptions::default()).await;
        // fetched just now, but the observation is over an hour old
        assert!(segment.is_stale());
        segment.render(&mut out, &FormatOptions::default()).await;
        assert!(!segment.is_stale());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_unset_location_follows_latest_report() {
        let observed = (Local::now() - TimeDelta::minutes(70)).fixed_offset();
        let mut moved = report(0, None);
        moved.conditions_location = "Smyrna Airport".to_string();
        let source = MockSource::new([Some(report(0, Some(observed))), Some(moved)]);
        let (mut out, buffer) = buffered_writer(instant_settings());
        let mut segment = WeatherSegment::with_source("wx", init(), None, source);

        segment.render(&mut out, &FormatOptions::default()).await;
        segment.render(&mut out, &FormatOptions::default()).await;

        let lines = buffer.lines();
        assert!(lines.contains(&"WEATHER AT NASHVILLE AIRPORT".to_string()));
        assert!(lines.contains(&"WEATHER AT SMYRNA AIRPORT".to_string()));
        assert!(segment.location.is_none());
    }

    #[tokio::test]
    async fn test_configured_location_wins_over_report() {
        let (mut out, buffer) = buffered_writer(instant_settings());
        let source = MockSource::new([Some(report(0, None))]);
        let mut segment =
            WeatherSegment::with_source("wx", init(), Some("Home".to_string()), source);

        segment.render(&mut out, &FormatOptions::default()).await;

        let lines = buffer.lines();
        assert!(lines.contains(&"WEATHER AT HOME".to_string()));
        assert!(!lines.iter().any(|l| l.contains("NASHVILLE")));
    }
}
