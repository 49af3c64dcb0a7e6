//! Test utilities: in-memory output, zero-delay settings, scripted sources and segments

use crate::config::DisplaySettings;
use crate::display::TimedWriter;
use crate::error::AppError;
use crate::fetch::DataSource;
use crate::segments::{FormatOptions, Segment};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A cloneable in-memory sink; every clone shares the same bytes.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, as text.
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Non-blank lines written so far, trimmed of the newline padding.
    pub fn lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .map(|l| l.trim_end().to_string())
            .filter(|l| !l.is_empty())
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut bytes) = self.bytes.lock() {
            bytes.clear();
        }
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self
            .bytes
            .lock()
            .map_err(|_| io::Error::other("shared buffer poisoned"))?;
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Settings with every delay at zero, 40 columns, uppercase and verbose updates on.
pub fn instant_settings() -> DisplaySettings {
    DisplaySettings {
        cps: f64::INFINITY,
        newline_cps: f64::INFINITY,
        beat_seconds: 0.0,
        width: 40,
        force_uppercase: true,
        verbose_updates: true,
        ..DisplaySettings::default()
    }
}

/// A writer over a fresh [`SharedBuffer`] with the given settings.
pub fn buffered_writer(settings: DisplaySettings) -> (TimedWriter, SharedBuffer) {
    let buffer = SharedBuffer::new();
    let writer = TimedWriter::new(settings, Box::new(buffer.clone())).with_seed(42);
    (writer, buffer)
}

/// A data source that replays scripted results; `None` entries fail.
///
/// Once the script runs out every fetch fails. Clones share the script and
/// the call counter, so a test can keep one clone to inspect.
#[derive(Debug, Clone)]
pub struct MockSource<T> {
    script: Arc<Mutex<VecDeque<Option<T>>>>,
    calls: Arc<AtomicUsize>,
}

impl<T> MockSource<T> {
    pub fn new(script: impl IntoIterator<Item = Option<T>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into_iter().collect())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source whose every fetch fails.
    pub fn failing() -> Self {
        Self::new(std::iter::empty())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> DataSource for MockSource<T> {
    type Payload = T;

    fn describe(&self) -> String {
        "mock source".to_string()
    }

    async fn fetch(&self) -> Result<T, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().ok().and_then(|mut s| s.pop_front()).flatten();
        next.ok_or_else(|| AppError::api_no_data("scripted failure", "mock://source"))
    }
}

/// A segment that writes its label and records every render.
#[derive(Debug, Clone)]
pub struct RecordingSegment {
    label: String,
    intro: Option<String>,
    stale: bool,
    renders: Arc<AtomicUsize>,
    refreshes: Arc<AtomicUsize>,
    formats: Arc<Mutex<Vec<FormatOptions>>>,
}

impl RecordingSegment {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            intro: None,
            stale: false,
            renders: Arc::new(AtomicUsize::new(0)),
            refreshes: Arc::new(AtomicUsize::new(0)),
            formats: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_intro(mut self, intro: impl Into<String>) -> Self {
        self.intro = Some(intro.into());
        self
    }

    /// Reports stale until the first refresh.
    pub fn initially_stale(mut self) -> Self {
        self.stale = true;
        self
    }

    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    /// Format options of every render so far, in order.
    pub fn formats(&self) -> Vec<FormatOptions> {
        self.formats.lock().map(|f| f.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Segment for RecordingSegment {
    fn introduction(&self) -> Option<&str> {
        self.intro.as_deref()
    }

    fn is_stale(&self) -> bool {
        self.stale
    }

    async fn refresh(&mut self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        self.stale = false;
    }

    async fn show(&mut self, out: &mut TimedWriter, format: &FormatOptions) {
        self.renders.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut formats) = self.formats.lock() {
            formats.push(format.clone());
        }
        out.write(&self.label).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_buffer_clones_share_bytes() {
        let buffer = SharedBuffer::new();
        let mut clone = buffer.clone();
        clone.write_all(b"abc\n   \nd").unwrap();
        assert_eq!(buffer.contents(), "abc\n   \nd");
        assert_eq!(buffer.lines(), vec!["abc", "d"]);
        buffer.clear();
        assert!(clone.contents().is_empty());
    }

    #[tokio::test]
    async fn test_mock_source_replays_script() {
        let source = MockSource::new([Some(1), None, Some(3)]);
        assert_eq!(source.fetch().await.unwrap(), 1);
        assert!(source.fetch().await.is_err());
        assert_eq!(source.fetch().await.unwrap(), 3);
        assert!(source.fetch().await.is_err());
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test]
    async fn test_recording_segment_render_refreshes_once() {
        let (mut out, buffer) = buffered_writer(instant_settings());
        let segment = RecordingSegment::new("alpha").initially_stale();
        let probe = segment.clone();
        let mut boxed: Box<dyn Segment> = Box::new(segment);

        boxed.render(&mut out, &FormatOptions::default()).await;
        boxed.render(&mut out, &FormatOptions::default()).await;

        assert_eq!(probe.refreshes(), 1);
        assert_eq!(probe.renders(), 2);
        let contents = buffer.contents();
        assert_eq!(contents.matches("[UPDATING DATA...]").count(), 1);
        assert_eq!(contents.matches("ALPHA").count(), 2);
    }
}
