//! The timed writer: paced characters, wrapped lines, framed headers,
//! busy indicators and jittered newlines.

use crate::config::DisplaySettings;
use crate::display::wrap::wrap_text;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, trace};

/// Paces every character of output onto a single sink.
///
/// Writes cannot fail from the caller's point of view: an I/O error on the
/// sink is logged and the character is dropped, keeping the feed running.
pub struct TimedWriter {
    settings: DisplaySettings,
    print_delay: Duration,
    newline_delay: Duration,
    beat: Duration,
    sink: Box<dyn Write + Send>,
    rng: SmallRng,
}

impl TimedWriter {
    /// Creates a writer over any sink.
    pub fn new(settings: DisplaySettings, sink: Box<dyn Write + Send>) -> Self {
        let print_delay = settings.print_delay();
        let newline_delay = settings.newline_delay();
        let beat = settings.beat();
        debug!(
            "TimedWriter: width={}, print_delay={:?}, newline_delay={:?}, beat={:?}",
            settings.width, print_delay, newline_delay, beat
        );
        Self {
            settings,
            print_delay,
            newline_delay,
            beat,
            sink,
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Creates a writer over standard output.
    pub fn stdout(settings: DisplaySettings) -> Self {
        Self::new(settings, Box::new(io::stdout()))
    }

    /// Fixes the jitter sequence, for reproducible output.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    pub fn width(&self) -> usize {
        self.settings.width
    }

    /// Length of one beat, for segments that pause between items.
    pub fn beat(&self) -> Duration {
        self.beat
    }

    /// Waits `n` beats; anything below one counts as a single beat.
    pub async fn wait_beats(&mut self, n: i32) {
        let n = if n < 1 { 1 } else { n as u32 };
        self.pause(self.beat * n).await;
    }

    /// Writes a full line.
    pub async fn write(&mut self, text: &str) {
        self.write_with_end(text, "\n").await;
    }

    /// Writes text without ending the line.
    pub async fn write_inline(&mut self, text: &str) {
        self.write_with_end(text, "").await;
    }

    /// Writes text one character at a time, then `end`.
    ///
    /// Text wider than the display is word-wrapped, and every wrapped line gets
    /// its own `end`.
    pub async fn write_with_end(&mut self, text: &str, end: &str) {
        if text.chars().count() > self.settings.width {
            for line in wrap_text(text, self.settings.width) {
                self.write_line(&line, end).await;
            }
            return;
        }
        self.write_line(text, end).await;
    }

    async fn write_line(&mut self, text: &str, end: &str) {
        for c in text.chars() {
            if self.settings.force_uppercase {
                let upper: String = c.to_uppercase().collect();
                self.emit(&upper);
            } else {
                let mut buf = [0u8; 4];
                self.emit(c.encode_utf8(&mut buf));
            }
            self.pause(self.print_delay).await;
        }
        self.emit(end);
        self.pause(self.print_delay).await;
    }

    /// Writes a blank line slowly, as `width` spaces.
    pub async fn newline(&mut self) {
        self.newline_with_pause(Duration::ZERO).await;
    }

    /// Writes a blank line and lingers for `extra` at one random column.
    ///
    /// The column is chosen afresh on every call so a resting cursor never
    /// sits on the same spot of the screen.
    pub async fn newline_with_pause(&mut self, extra: Duration) {
        let width = self.settings.width;
        let pause_pos = self.rng.random_range(0..width.max(1));
        trace!("newline: extra pause {:?} at column {}", extra, pause_pos);
        for i in 0..width {
            self.emit(" ");
            self.pause(self.newline_delay).await;
            if i == pause_pos {
                self.pause(extra).await;
            }
        }
        self.emit("\n");
        self.pause(self.newline_delay).await;
    }

    /// Writes a header framed by the same marker on both sides.
    pub async fn header(&mut self, text: &str, marker: &str) {
        self.header_with(text, marker, marker).await;
    }

    /// Writes `text` centered between runs of markers.
    ///
    /// With width 40, `header_with("Stocks", "$", "$")` produces 15 markers,
    /// `"  STOCKS  "`, and 15 more markers.
    pub async fn header_with(&mut self, text: &str, left: &str, right: &str) {
        let line = self.header_line(text, left, right);
        self.write(&line).await;
    }

    /// Builds the framed header line without writing it.
    pub fn header_line(&self, text: &str, left: &str, right: &str) -> String {
        let mut text = text.trim().to_string();
        if self.settings.force_uppercase {
            text = text.to_uppercase();
        }
        let marker_count = self
            .settings
            .width
            .saturating_sub(4 + text.chars().count())
            / 2;
        format!(
            "{}  {}  {}",
            left.repeat(marker_count),
            text,
            right.repeat(marker_count)
        )
    }

    /// Shows `[message...]` with a beat before each dot, when verbose updates are on.
    pub async fn busy_indicator(&mut self, message: &str) {
        if !self.settings.verbose_updates {
            return;
        }
        self.write_inline(&format!("[{message}")).await;
        for _ in 0..3 {
            self.wait_beats(1).await;
            self.write_inline(".").await;
        }
        self.wait_beats(1).await;
        self.write("]").await;
        self.newline().await;
    }

    async fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }

    fn emit(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        let result = self
            .sink
            .write_all(s.as_bytes())
            .and_then(|_| self.sink.flush());
        if let Err(e) = result {
            debug!("Dropped output after write error: {e}");
        }
    }
}
