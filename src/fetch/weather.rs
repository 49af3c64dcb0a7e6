//! Current conditions and forecast from weather.gov

use super::{DataSource, fetch_json};
use crate::constants::NOT_AVAILABLE;
use crate::display::clean_chars;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDateTime, TimeZone};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Headline weather.gov always lists; it carries no actual hazard.
const IGNORED_HAZARD: &str = "Hazardous Weather Outlook";

/// US zone abbreviations weather.gov uses in its "last update" text.
const UTC_OFFSETS: [(&str, &str); 12] = [
    ("EST", "-0500"),
    ("CST", "-0600"),
    ("MST", "-0700"),
    ("PST", "-0800"),
    ("AKST", "-0900"),
    ("HST", "-1000"),
    ("EDT", "-0400"),
    ("CDT", "-0500"),
    ("MDT", "-0600"),
    ("PDT", "-0700"),
    ("AKDT", "-0800"),
    ("HDT", "-0900"),
];

const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// One named forecast period, e.g. "Tonight".
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPeriod {
    pub timeframe: String,
    pub forecast: String,
}

/// Everything the weather segment displays.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub conditions_location: String,
    pub currently: String,
    pub temp_f: String,
    pub temp_c: String,
    pub humidity: String,
    pub barometer: String,
    pub wind_speed: String,
    pub visibility: String,
    pub dewpoint: String,
    pub comfort: String,
    pub last_update: String,
    pub last_update_at: Option<DateTime<FixedOffset>>,
    pub periods: Vec<ForecastPeriod>,
    pub hazards: Vec<String>,
}

impl WeatherReport {
    /// Report shown when weather.gov could not be reached or read.
    pub fn unavailable() -> Self {
        let na = || NOT_AVAILABLE.to_string();
        Self {
            conditions_location: na(),
            currently: na(),
            temp_f: na(),
            temp_c: na(),
            humidity: na(),
            barometer: na(),
            wind_speed: na(),
            visibility: na(),
            dewpoint: na(),
            comfort: String::new(),
            last_update: na(),
            last_update_at: None,
            periods: vec![ForecastPeriod {
                timeframe: NOT_AVAILABLE.to_string(),
                forecast: "Forecast Not Available".to_string(),
            }],
            hazards: Vec::new(),
        }
    }
}

/// weather.gov point forecast for one latitude/longitude.
#[derive(Debug, Clone)]
pub struct WeatherGovSource {
    client: Client,
    base_url: String,
    lat: f64,
    lon: f64,
}

impl WeatherGovSource {
    pub fn new(client: Client, lat: f64, lon: f64) -> Self {
        Self::with_base_url(client, crate::constants::urls::WEATHER_GOV, lat, lon)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            lat,
            lon,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/MapClick.php?lat={}&lon={}&FcstType=json",
            self.base_url, self.lat, self.lon
        )
    }
}

#[async_trait]
impl DataSource for WeatherGovSource {
    type Payload = WeatherReport;

    fn describe(&self) -> String {
        format!("weather.gov ({}, {})", self.lat, self.lon)
    }

    async fn fetch(&self) -> Result<WeatherReport, AppError> {
        let url = self.url();
        let json: Value = fetch_json(&self.client, &url).await?;
        parse_report(&json, Local::now().year())
            .ok_or_else(|| AppError::scrape_failed("no current observation in forecast", url))
    }
}

/// Builds a report from the MapClick JSON document.
///
/// Returns `None` when the document has no current observation, which is how
/// the service answers while it is degraded. Individual missing fields become
/// `N/A` instead.
pub fn parse_report(json: &Value, year: i32) -> Option<WeatherReport> {
    let obs = json.get("currentobservation")?;
    let field = |key: &str| text_at(obs, key);

    let temp_f = field("Temp").and_then(|t| t.parse::<f64>().ok());
    let dewpoint_f = field("Dewp").and_then(|t| t.parse::<f64>().ok());
    let last_update = field("Date").unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let last_update_at = parse_last_update(&last_update, year);
    debug!("weather.gov last update {:?} parsed as {:?}", last_update, last_update_at);

    let timeframes = string_list(json.pointer("/time/startPeriodName"));
    let forecasts = string_list(json.pointer("/data/text"));
    let periods = timeframes
        .into_iter()
        .zip(forecasts)
        .map(|(timeframe, forecast)| ForecastPeriod {
            timeframe,
            forecast,
        })
        .collect();

    let hazards = string_list(json.pointer("/data/hazard"))
        .into_iter()
        .filter(|h| !h.is_empty() && h != IGNORED_HAZARD)
        .collect();

    Some(WeatherReport {
        conditions_location: field("name")
            .or_else(|| json.pointer("/location/areaDescription").and_then(value_text))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        currently: field("Weather").unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        temp_f: temp_f.map_or_else(na, |f| format!("{f:.0}F")),
        temp_c: temp_f.map_or_else(na, |f| format!("{:.0}C", to_celsius(f))),
        humidity: field("Relh").map_or_else(na, |h| format!("{h}%")),
        barometer: field("SLP").map_or_else(na, |p| format!("{p} in")),
        wind_speed: describe_wind(field("Windd").as_deref(), field("Winds").as_deref()),
        visibility: field("Visibility").map_or_else(na, |v| format!("{v} mi")),
        dewpoint: dewpoint_f.map_or_else(na, |d| format!("{d:.0}F ({:.0}C)", to_celsius(d))),
        comfort: dewpoint_f.map(comfort_from_dewpoint).unwrap_or_default().to_string(),
        last_update,
        last_update_at,
        periods,
        hazards,
    })
}

fn na() -> String {
    NOT_AVAILABLE.to_string()
}

fn to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

/// Text of a scalar JSON value, treating weather.gov's "NA" as absent.
fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => clean_chars(s),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() || text == "NA" || text == "null" {
        None
    } else {
        Some(text)
    }
}

fn text_at(obj: &Value, key: &str) -> Option<String> {
    obj.get(key).and_then(value_text)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|v| value_text(v).unwrap_or_default())
                .collect()
        })
        .unwrap_or_default()
}

/// Wind as compass direction and speed, e.g. "SSW 8 mph", or "Calm".
pub fn describe_wind(direction: Option<&str>, speed: Option<&str>) -> String {
    let Some(speed) = speed.and_then(|s| s.parse::<f64>().ok()) else {
        return na();
    };
    if speed < 1.0 {
        return "Calm".to_string();
    }
    match direction.and_then(|d| d.parse::<f64>().ok()) {
        Some(degrees) => {
            let index = ((degrees.rem_euclid(360.0) / 22.5) + 0.5) as usize % COMPASS.len();
            format!("{} {:.0} mph", COMPASS[index], speed)
        }
        None => format!("{speed:.0} mph"),
    }
}

/// Describes how muggy it feels for a dewpoint in Fahrenheit.
pub fn comfort_from_dewpoint(dewpoint_f: f64) -> &'static str {
    let dp = dewpoint_f.round() as i64;
    match dp {
        i64::MIN..=49 => "Dry",
        50..=60 => "Pleasant",
        61..=65 => "A Bit Humid",
        66..=70 => "Humid",
        71..=75 => "Very Humid",
        _ => "Oppressive",
    }
}

/// Parses weather.gov's "last update" text, e.g. `19 Oct 2:53 pm CDT`.
///
/// The text carries no year, so the caller supplies it. A zone missing from
/// the known US abbreviations is read as local time.
pub fn parse_last_update(text: &str, year: i32) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    let (rest, zone) = text.rsplit_once(' ')?;

    if let Some((_, offset)) = UTC_OFFSETS.iter().find(|(abbr, _)| *abbr == zone) {
        let stamped = format!("{year} {rest} {offset}");
        return DateTime::parse_from_str(&stamped, "%Y %d %b %I:%M %p %z").ok();
    }

    let naive = NaiveDateTime::parse_from_str(&format!("{year} {text}"), "%Y %d %b %I:%M %p")
        .or_else(|_| NaiveDateTime::parse_from_str(&format!("{year} {rest}"), "%Y %d %b %I:%M %p"))
        .ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
}
