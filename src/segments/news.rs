//! AP top stories, either as full stories or a headline list

use super::{
    FormatOptions, RefreshUnit, Rotation, Segment, SegmentContext, SegmentInit, StalenessCache,
    Timestamped, fetch_or_sentinel, options::parse_init,
};
use crate::constants::refresh::NEWS_MINUTES;
use crate::display::TimedWriter;
use crate::error::AppError;
use crate::fetch::DataSource;
use crate::fetch::news::{ApNewsSource, NewsItem};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::Deserialize;

const INTRO: &str = "News from apnews.com";
const STORY_UNAVAILABLE: &str = "*** Item Story Unavailable ***";
const DEFAULT_MAX_ITEMS: i64 = 15;
const MAX_ITEMS_LIMIT: i64 = 30;
const MAX_ITEM_LENGTH: i64 = 10;

#[derive(Debug, Clone)]
pub struct NewsData {
    pub fetched_at: DateTime<Local>,
    pub items: Rotation<NewsItem>,
}

impl Timestamped for NewsData {
    fn fetched_at(&self) -> DateTime<Local> {
        self.fetched_at
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NewsInit {
    max_items: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NewsFormat {
    items: Option<i64>,
    item_length: Option<i64>,
    headline_mode: bool,
}

pub struct NewsSegment<S = ApNewsSource> {
    name: String,
    intro: Option<String>,
    max_items: usize,
    source: S,
    cache: StalenessCache<NewsData>,
}

/// Resolves the `max_items` init key to 1..=30.
fn resolve_max_items(requested: Option<i64>) -> usize {
    requested
        .unwrap_or(DEFAULT_MAX_ITEMS)
        .clamp(1, MAX_ITEMS_LIMIT) as usize
}

impl NewsSegment<ApNewsSource> {
    pub fn from_context(ctx: &SegmentContext<'_>) -> Result<Self, AppError> {
        let init = SegmentInit::resolve(
            ctx.name,
            ctx.options,
            NEWS_MINUTES,
            RefreshUnit::Minutes,
            Some(INTRO),
        )?;
        let news: NewsInit = parse_init(ctx.name, ctx.options)?;
        let max_items = resolve_max_items(news.max_items);
        let source = ApNewsSource::new(ctx.client.clone(), max_items);
        Ok(Self::with_source(ctx.name, init, max_items, source))
    }
}

impl<S: DataSource<Payload = Vec<NewsItem>>> NewsSegment<S> {
    pub fn with_source(name: &str, init: SegmentInit, max_items: usize, source: S) -> Self {
        Self {
            name: name.to_string(),
            intro: init.intro,
            max_items: max_items.max(1),
            source,
            cache: StalenessCache::new(init.refresh),
        }
    }

    pub fn data(&self) -> Option<&NewsData> {
        self.cache.payload()
    }

    async fn show_stories(&mut self, out: &mut TimedWriter, count: usize, length: usize) {
        out.header("AP News", "!").await;
        out.newline().await;
        let beat = out.beat();
        for i in 0..count {
            let Some(item) = self
                .cache
                .payload_mut()
                .and_then(|data| data.items.next_item().cloned())
            else {
                break;
            };
            out.newline_with_pause(beat).await;
            if length > 1 && i > 0 {
                out.newline().await;
            }
            match &item.story {
                Some(story) if !story.is_empty() => {
                    for paragraph in story.iter().take(length) {
                        out.write(paragraph).await;
                        out.newline().await;
                    }
                }
                _ => {
                    out.write(&item.headline).await;
                    out.write(STORY_UNAVAILABLE).await;
                }
            }
        }
    }

    async fn show_headlines(&self, out: &mut TimedWriter, count: usize) {
        out.header("AP Top Headlines", "!").await;
        let Some(data) = self.cache.payload() else {
            return;
        };
        let beat = out.beat();
        for item in data.items.items().iter().take(count) {
            out.newline_with_pause(beat).await;
            out.write(&item.headline).await;
        }
    }
}

#[async_trait]
impl<S: DataSource<Payload = Vec<NewsItem>>> Segment for NewsSegment<S> {
    fn introduction(&self) -> Option<&str> {
        self.intro.as_deref()
    }

    fn is_stale(&self) -> bool {
        self.cache.is_stale()
    }

    fn update_message(&self) -> &str {
        "Getting Latest News"
    }

    async fn refresh(&mut self) {
        let mut items = fetch_or_sentinel(&self.name, &self.source, Vec::new).await;
        if items.is_empty() {
            items.push(NewsItem::unavailable());
        }
        self.cache.store(NewsData {
            fetched_at: Local::now(),
            items: Rotation::with_ceiling(items, self.max_items),
        });
    }

    async fn show(&mut self, out: &mut TimedWriter, format: &FormatOptions) {
        let format: NewsFormat = format.parse();
        if format.headline_mode {
            let count = format.items.unwrap_or(self.max_items as i64).max(0) as usize;
            self.show_headlines(out, count).await;
        } else {
            let count = format.items.unwrap_or(3).max(0) as usize;
            let length = format.item_length.unwrap_or(1).clamp(1, MAX_ITEM_LENGTH) as usize;
            self.show_stories(out, count, length).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::{MockSource, buffered_writer, instant_settings};
    use chrono::TimeDelta;

    fn init() -> SegmentInit {
        SegmentInit {
            refresh: TimeDelta::minutes(30),
            intro: Some(INTRO.to_string()),
        }
    }

    fn items(n: usize) -> Vec<NewsItem> {
        (0..n)
            .map(|i| NewsItem {
                headline: format!("Headline {i}"),
                url: Some(format!("https://apnews.com/article/{i}")),
                story: Some(vec![format!("Story {i} first"), format!("Story {i} second")]),
            })
            .collect()
    }

    fn format(toml_text: &str) -> FormatOptions {
        FormatOptions::new(toml::from_str(toml_text).unwrap())
    }

    #[test]
    fn test_max_items_clamp() {
        assert_eq!(resolve_max_items(None), 15);
        assert_eq!(resolve_max_items(Some(0)), 1);
        assert_eq!(resolve_max_items(Some(99)), 30);
    }

    #[tokio::test]
    async fn test_refresh_rewinds_the_cursor() {
        let (mut out, buffer) = buffered_writer(instant_settings());
        let source = MockSource::new([Some(items(4)), Some(items(4))]);
        let mut segment = NewsSegment::with_source("news", init(), 15, source.clone());

        segment.render(&mut out, &FormatOptions::default()).await;
        assert_eq!(segment.data().map(|d| d.items.cursor()), Some(3));

        segment.refresh().await;
        assert_eq!(segment.data().map(|d| d.items.cursor()), Some(0));
        assert_eq!(source.calls(), 2);

        buffer.clear();
        segment.render(&mut out, &FormatOptions::default()).await;
        let lines = buffer.lines();
        assert!(lines.contains(&"STORY 0 FIRST".to_string()));
        assert!(!lines.contains(&"STORY 3 FIRST".to_string()));
    }

    #[tokio::test]
    async fn test_stories_advance_the_cursor() {
        let (mut out, buffer) = buffered_writer(instant_settings());
        let mut segment = NewsSegment::with_source("news", init(), 15, MockSource::new([Some(items(4))]));

        segment.render(&mut out, &FormatOptions::default()).await;
        let first = buffer.lines();
        assert!(first.contains(&"STORY 0 FIRST".to_string()));
        assert!(first.contains(&"STORY 2 FIRST".to_string()));
        assert!(!first.iter().any(|l| l.contains("SECOND")));
        assert_eq!(segment.data().map(|d| d.items.cursor()), Some(3));

        buffer.clear();
        segment.render(&mut out, &FormatOptions::default()).await;
        let second = buffer.lines();
        // 3, then wraps to 0 and 1
        assert!(second.contains(&"STORY 3 FIRST".to_string()));
        assert!(second.contains(&"STORY 1 FIRST".to_string()));
        assert_eq!(segment.data().map(|d| d.items.cursor()), Some(2));
    }

    #[tokio::test]
    async fn test_item_length_shows_more_paragraphs() {
        let (mut out, buffer) = buffered_writer(instant_settings());
        let mut segment = NewsSegment::with_source("news", init(), 15, MockSource::new([Some(items(2))]));
        segment
            .render(&mut out, &format("items = 1\nitem_length = 4"))
            .await;
        let lines = buffer.lines();
        assert!(lines.contains(&"STORY 0 SECOND".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("STORY 1")));
    }

    #[tokio::test]
    async fn test_headline_mode_leaves_cursor_alone() {
        let (mut out, buffer) = buffered_writer(instant_settings());
        let mut segment = NewsSegment::with_source("news", init(), 3, MockSource::new([Some(items(5))]));
        segment.render(&mut out, &format("items = 1")).await;
        buffer.clear();

        segment.render(&mut out, &format("headline_mode = true")).await;
        let lines = buffer.lines();
        assert!(lines[0].contains("AP TOP HEADLINES"));
        assert_eq!(&lines[1..], ["HEADLINE 0", "HEADLINE 1", "HEADLINE 2"]);
        assert_eq!(segment.data().map(|d| d.items.cursor()), Some(1));
    }

    #[tokio::test]
    async fn test_missing_story_is_called_out() {
        let mut list = items(1);
        list[0].story = None;
        let (mut out, buffer) = buffered_writer(instant_settings());
        let mut segment = NewsSegment::with_source("news", init(), 15, MockSource::new([Some(list)]));
        segment.render(&mut out, &FormatOptions::default()).await;
        let lines = buffer.lines();
        assert!(lines.contains(&"HEADLINE 0".to_string()));
        assert!(lines.contains(&STORY_UNAVAILABLE.to_uppercase()));
    }

    #[tokio::test]
    async fn test_failed_fetch_shows_unavailable_feed() {
        let (mut out, buffer) = buffered_writer(instant_settings());
        let mut segment =
            NewsSegment::with_source("news", init(), 15, MockSource::<Vec<NewsItem>>::failing());
        segment.render(&mut out, &FormatOptions::default()).await;
        let contents = buffer.contents();
        assert!(contents.contains("*** NEWSFEED UNAVAILABLE ***"));
        assert_eq!(segment.data().map(|d| d.items.len()), Some(1));
        assert!(!segment.is_stale());
    }
}
