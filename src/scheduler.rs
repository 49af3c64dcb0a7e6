//! The endless playlist loop

use crate::config::PlaylistEntry;
use crate::display::TimedWriter;
use crate::error::AppError;
use crate::segments::SegmentRegistry;
use std::time::Duration;
use tracing::{debug, warn};

/// What happened on one step of the playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The named segment was rendered.
    Rendered(String),
    /// The playlist named a segment the registry does not have.
    Missing(String),
}

/// Walks the playlist forever, rendering one entry at a time.
///
/// Entries are rendered strictly in order and one at a time; a segment that
/// refreshes does so inline, so the output pauses while it fetches.
pub struct PlaylistScheduler {
    out: TimedWriter,
    registry: SegmentRegistry,
    entries: Vec<PlaylistEntry>,
    pause: Duration,
    position: usize,
}

impl PlaylistScheduler {
    /// Fails when the playlist has no entries.
    pub fn new(
        out: TimedWriter,
        registry: SegmentRegistry,
        entries: Vec<PlaylistEntry>,
        pause: Duration,
    ) -> Result<Self, AppError> {
        if entries.is_empty() {
            return Err(AppError::config_error("playlist order has no entries"));
        }
        Ok(Self {
            out,
            registry,
            entries,
            pause,
            position: 0,
        })
    }

    /// Index of the entry the next step will play.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn writer(&self) -> &TimedWriter {
        &self.out
    }

    /// Plays the entry under the cursor and advances, wrapping at the end of the playlist.
    pub async fn step(&mut self) -> StepOutcome {
        let entry = &self.entries[self.position];
        self.position = (self.position + 1) % self.entries.len();

        self.out.newline().await;
        self.out.newline().await;

        let outcome = match self.registry.get_mut(&entry.name) {
            Some(segment) => {
                debug!("Rendering segment '{}'", entry.name);
                segment.render(&mut self.out, &entry.format).await;
                self.out.newline().await;
                StepOutcome::Rendered(entry.name.clone())
            }
            None => {
                warn!("Playlist names undeclared segment '{}'", entry.name);
                self.out.newline().await;
                self.out
                    .header(&format!("Missing Segment \"{}\"", entry.name), "*")
                    .await;
                StepOutcome::Missing(entry.name.clone())
            }
        };
        self.out.newline_with_pause(self.pause).await;
        outcome
    }

    /// Runs the playlist until the process is stopped; never returns.
    pub async fn run(&mut self) {
        loop {
            self.step().await;
        }
    }
}
