//! Segments: the pluggable units of content the playlist cycles through.
//!
//! Each provider module defines one concrete [`Segment`]. Data-backed segments
//! keep their last payload in a [`StalenessCache`] and refresh it inline, right
//! before rendering, whenever it has gone stale.

pub mod cache;
pub mod date_time;
pub mod lucky_numbers;
pub mod news;
pub mod on_this_day;
pub mod options;
pub mod registry;
pub mod rotation;
pub mod station;
pub mod stocks;
pub mod template;
pub mod weather;

pub use cache::{StalenessCache, Timestamped};
pub use options::{FormatOptions, RefreshUnit, SegmentInit};
pub use registry::{SegmentContext, SegmentRegistry};
pub use rotation::Rotation;

use crate::display::TimedWriter;
use crate::fetch::DataSource;
use async_trait::async_trait;
use tracing::{info, warn};

/// Busy-indicator text used when a provider does not supply its own.
pub const DEFAULT_UPDATE_MESSAGE: &str = "Updating Data";

/// A unit of content with its own cached data and render cycle.
///
/// The scheduler only ever calls [`render`](Segment::render); the other
/// methods are the provider's hooks into that lifecycle.
#[async_trait]
pub trait Segment: Send {
    /// Text shown once per distinct introduction when the feed starts.
    fn introduction(&self) -> Option<&str> {
        None
    }

    /// Whether the cached payload must be refreshed before the next render.
    fn is_stale(&self) -> bool {
        false
    }

    /// Message for the busy indicator shown while refreshing.
    fn update_message(&self) -> &str {
        DEFAULT_UPDATE_MESSAGE
    }

    /// Fetches new data and replaces the cached payload.
    ///
    /// Never fails: a provider that cannot fetch stores a sentinel payload.
    async fn refresh(&mut self) {}

    /// Writes the current payload, honoring the entry's format options.
    async fn show(&mut self, out: &mut TimedWriter, format: &FormatOptions);

    /// Refreshes if stale, then shows.
    async fn render(&mut self, out: &mut TimedWriter, format: &FormatOptions) {
        if self.is_stale() {
            let message = self.update_message().to_string();
            out.busy_indicator(&message).await;
            self.refresh().await;
        }
        self.show(out, format).await;
    }
}

/// Fetches a fresh payload, or builds the sentinel payload when the fetch fails.
///
/// Failures stop here: they are logged and never reach the scheduler.
pub(crate) async fn fetch_or_sentinel<S, F>(segment: &str, source: &S, sentinel: F) -> S::Payload
where
    S: DataSource,
    F: FnOnce() -> S::Payload,
{
    match source.fetch().await {
        Ok(payload) => {
            info!("Segment '{}' refreshed from {}", segment, source.describe());
            payload
        }
        Err(e) => {
            if e.is_retryable() {
                warn!(
                    "Segment '{}' fetch failed, will retry at next refresh: {}",
                    segment, e
                );
            } else if e.is_not_found() {
                warn!("Segment '{}' has nothing upstream: {}", segment, e);
            } else {
                warn!("Segment '{}' fetch failed: {}", segment, e);
            }
            sentinel()
        }
    }
}
