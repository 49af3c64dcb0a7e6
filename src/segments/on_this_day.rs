//! Anniversaries of the day from Wikipedia

use super::{
    FormatOptions, RefreshUnit, Rotation, Segment, SegmentContext, SegmentInit, StalenessCache,
    Timestamped, fetch_or_sentinel,
};
use crate::constants::refresh::DEFAULT_MINUTES;
use crate::display::TimedWriter;
use crate::error::AppError;
use crate::fetch::DataSource;
use crate::fetch::on_this_day::{OnThisDay, WikipediaSource, day_label};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::Deserialize;

const INTRO: &str = "\"On This Day\" provided by Wikipedia.com";

#[derive(Debug, Clone)]
pub struct OnThisDayData {
    pub fetched_at: DateTime<Local>,
    pub label: String,
    pub items: Rotation<String>,
}

impl Timestamped for OnThisDayData {
    fn fetched_at(&self) -> DateTime<Local> {
        self.fetched_at
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct OnThisDayFormat {
    items: i64,
}

impl Default for OnThisDayFormat {
    fn default() -> Self {
        Self { items: 1 }
    }
}

pub struct OnThisDaySegment<S = WikipediaSource> {
    name: String,
    intro: Option<String>,
    source: S,
    cache: StalenessCache<OnThisDayData>,
}

impl OnThisDaySegment<WikipediaSource> {
    pub fn from_context(ctx: &SegmentContext<'_>) -> Result<Self, AppError> {
        let init = SegmentInit::resolve(
            ctx.name,
            ctx.options,
            DEFAULT_MINUTES,
            RefreshUnit::Minutes,
            Some(INTRO),
        )?;
        let source = WikipediaSource::new(ctx.client.clone());
        Ok(Self::with_source(ctx.name, init, source))
    }
}

impl<S: DataSource<Payload = OnThisDay>> OnThisDaySegment<S> {
    pub fn with_source(name: &str, init: SegmentInit, source: S) -> Self {
        Self {
            name: name.to_string(),
            intro: init.intro,
            source,
            cache: StalenessCache::new(init.refresh),
        }
    }

    pub fn data(&self) -> Option<&OnThisDayData> {
        self.cache.payload()
    }
}

#[async_trait]
impl<S: DataSource<Payload = OnThisDay>> Segment for OnThisDaySegment<S> {
    fn introduction(&self) -> Option<&str> {
        self.intro.as_deref()
    }

    fn is_stale(&self) -> bool {
        self.cache.is_stale()
    }

    fn update_message(&self) -> &str {
        "Consulting Wikipedia"
    }

    async fn refresh(&mut self) {
        let day = fetch_or_sentinel(&self.name, &self.source, || OnThisDay {
            label: day_label(Local::now().date_naive()),
            items: Vec::new(),
        })
        .await;
        self.cache.store(OnThisDayData {
            fetched_at: Local::now(),
            label: day.label,
            items: Rotation::new(day.items),
        });
    }

    async fn show(&mut self, out: &mut TimedWriter, format: &FormatOptions) {
        let format: OnThisDayFormat = format.parse();
        let count = if format.items < 0 { 1 } else { format.items as usize };
        let Some(data) = self.cache.payload_mut() else {
            return;
        };
        out.header(&format!("{}: On This Day", data.label), "-").await;
        out.newline().await;

        let beat = out.beat();
        if data.items.is_empty() {
            out.write("No \"On This Day\" data available").await;
            out.newline_with_pause(beat).await;
            return;
        }
        for _ in 0..count {
            let Some(item) = data.items.next_item() else {
                break;
            };
            out.write(item).await;
            out.newline_with_pause(beat).await;
        }
    }
}
