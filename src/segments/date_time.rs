//! Current date and time, in one of several phrasings

use super::{FormatOptions, Segment, SegmentContext, SegmentInit};
use crate::display::{TimedWriter, format_date, format_time};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::Deserialize;

/// Phrasing selected by the `format` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateTimeStyle {
    /// "It is <date>" then "Current time is <time>"
    #[default]
    Long,
    /// "<time>, <date>"
    Short,
    LongDate,
    LongTime,
    ShortDate,
    ShortTime,
}

impl DateTimeStyle {
    /// Unknown names fall back to [`DateTimeStyle::Long`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "short" => Self::Short,
            "longdate" => Self::LongDate,
            "longtime" => Self::LongTime,
            "shortdate" => Self::ShortDate,
            "shorttime" => Self::ShortTime,
            _ => Self::Long,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DateTimeFormat {
    format: Option<String>,
}

/// Lines to print for a style at a given moment.
pub fn date_time_lines(style: DateTimeStyle, now: &DateTime<Local>, use_24: bool) -> Vec<String> {
    let date_text = format_date(&now.date_naive());
    let time_text = format_time(now, use_24);
    let date_long = format!("It is {date_text}");
    let time_long = format!("Current time is {time_text}");
    match style {
        DateTimeStyle::Long => vec![date_long, time_long],
        DateTimeStyle::Short => vec![format!("{time_text}, {date_text}")],
        DateTimeStyle::LongDate => vec![date_long],
        DateTimeStyle::LongTime => vec![time_long],
        DateTimeStyle::ShortDate => vec![date_text],
        DateTimeStyle::ShortTime => vec![time_text],
    }
}

/// Shows the local clock; has no data and is never stale.
#[derive(Debug, Clone)]
pub struct DateTimeSegment {
    intro: Option<String>,
}

impl DateTimeSegment {
    pub fn new(intro: Option<String>) -> Self {
        Self { intro }
    }

    pub fn from_context(ctx: &SegmentContext<'_>) -> Result<Self, AppError> {
        let init = SegmentInit::resolve(
            ctx.name,
            ctx.options,
            crate::constants::refresh::DEFAULT_MINUTES,
            super::RefreshUnit::Minutes,
            None,
        )?;
        Ok(Self::new(init.intro))
    }
}

#[async_trait]
impl Segment for DateTimeSegment {
    fn introduction(&self) -> Option<&str> {
        self.intro.as_deref()
    }

    async fn show(&mut self, out: &mut TimedWriter, format: &FormatOptions) {
        let parsed: DateTimeFormat = format.parse();
        let style = parsed
            .format
            .as_deref()
            .map(DateTimeStyle::from_name)
            .unwrap_or_default();
        let use_24 = out.settings().prefer_24hr_time;
        for line in date_time_lines(style, &Local::now(), use_24) {
            out.write(&line).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::{buffered_writer, instant_settings};
    use chrono::TimeZone;

    fn moment() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 19, 14, 5, 0).unwrap()
    }

    #[test]
    fn test_style_names() {
        assert_eq!(DateTimeStyle::from_name("shorttime"), DateTimeStyle::ShortTime);
        assert_eq!(DateTimeStyle::from_name("LONG"), DateTimeStyle::Long);
        assert_eq!(DateTimeStyle::from_name("sideways"), DateTimeStyle::Long);
    }

    #[test]
    fn test_lines_per_style() {
        let now = moment();
        assert_eq!(
            date_time_lines(DateTimeStyle::Long, &now, true),
            vec!["It is Monday, October 19th", "Current time is 14:05"]
        );
        assert_eq!(
            date_time_lines(DateTimeStyle::Short, &now, false),
            vec!["2:05PM, Monday, October 19th"]
        );
        assert_eq!(
            date_time_lines(DateTimeStyle::LongTime, &now, false),
            vec!["Current time is 2:05PM"]
        );
        assert_eq!(
            date_time_lines(DateTimeStyle::ShortDate, &now, true),
            vec!["Monday, October 19th"]
        );
    }

    #[tokio::test]
    async fn test_show_defaults_to_long() {
        let (mut out, buffer) = buffered_writer(instant_settings());
        let mut segment = DateTimeSegment::new(None);
        segment.render(&mut out, &FormatOptions::default()).await;
        let lines = buffer.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("IT IS "));
        assert!(lines[1].starts_with("CURRENT TIME IS "));
        assert!(!segment.is_stale());
    }

    #[tokio::test]
    async fn test_show_honors_format_key() {
        let (mut out, buffer) = buffered_writer(instant_settings());
        let mut segment = DateTimeSegment::new(None);
        let format = FormatOptions::new(toml::from_str("format = 'longdate'").unwrap());
        segment.render(&mut out, &format).await;
        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("IT IS "));
    }
}
