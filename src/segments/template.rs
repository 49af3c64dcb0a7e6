//! Smallest possible data-backed segment, a starting point for new providers

use super::{FormatOptions, RefreshUnit, Segment, SegmentContext, SegmentInit, StalenessCache, Timestamped};
use crate::display::TimedWriter;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta};

#[derive(Debug, Clone)]
pub struct TemplateData {
    pub fetched_at: DateTime<Local>,
    pub message: String,
}

impl Timestamped for TemplateData {
    fn fetched_at(&self) -> DateTime<Local> {
        self.fetched_at
    }
}

pub struct TemplateSegment {
    intro: Option<String>,
    cache: StalenessCache<TemplateData>,
}

impl TemplateSegment {
    pub fn new(refresh: TimeDelta, intro: Option<String>) -> Self {
        Self {
            intro,
            cache: StalenessCache::new(refresh),
        }
    }

    pub fn from_context(ctx: &SegmentContext<'_>) -> Result<Self, AppError> {
        let init = SegmentInit::resolve(
            ctx.name,
            ctx.options,
            crate::constants::refresh::DEFAULT_MINUTES,
            RefreshUnit::Minutes,
            None,
        )?;
        Ok(Self::new(init.refresh, init.intro))
    }
}

#[async_trait]
impl Segment for TemplateSegment {
    fn introduction(&self) -> Option<&str> {
        self.intro.as_deref()
    }

    fn is_stale(&self) -> bool {
        self.cache.is_stale()
    }

    async fn refresh(&mut self) {
        self.cache.store(TemplateData {
            fetched_at: Local::now(),
            message: "hello, world".to_string(),
        });
    }

    async fn show(&mut self, out: &mut TimedWriter, _format: &FormatOptions) {
        out.header("Template", "=").await;
        out.newline().await;
        if let Some(data) = self.cache.payload() {
            out.write(&data.message).await;
        }
        out.newline().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::{buffered_writer, instant_settings};

    #[tokio::test]
    async fn test_first_render_refreshes_then_caches() {
        let (mut out, buffer) = buffered_writer(instant_settings());
        let mut segment = TemplateSegment::new(TimeDelta::minutes(60), None);
        assert!(segment.is_stale());

        segment.render(&mut out, &FormatOptions::default()).await;
        assert!(!segment.is_stale());
        segment.render(&mut out, &FormatOptions::default()).await;

        let contents = buffer.contents();
        assert_eq!(contents.matches("[UPDATING DATA...]").count(), 1);
        assert_eq!(contents.matches("HELLO, WORLD").count(), 2);
        assert!(buffer.lines().contains(&format!("{}  TEMPLATE  {}", "=".repeat(14), "=".repeat(14))));
    }
}
