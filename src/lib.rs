//! Retrofeed: a perpetual, slowly typed terminal feed
//!
//! This library provides the pieces of the feed: a paced text writer, a set of
//! content segments backed by public web sources, and the playlist scheduler
//! that cycles through them forever.
//!
//! # Examples
//!
//! ```rust,no_run
//! use retrofeed::config::Config;
//! use retrofeed::display::TimedWriter;
//! use retrofeed::error::AppError;
//! use retrofeed::fetch::create_http_client_with_timeout;
//! use retrofeed::scheduler::PlaylistScheduler;
//! use retrofeed::segments::SegmentRegistry;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load_from_path("retrofeed.toml").await?;
//!     let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
//!     let mut out = TimedWriter::stdout(config.display.clone());
//!
//!     // Introductions are written while the registry is built
//!     let registry = SegmentRegistry::build(&config, &client, &mut out).await?;
//!
//!     let mut scheduler = PlaylistScheduler::new(
//!         out,
//!         registry,
//!         config.playlist.order.clone(),
//!         config.playlist.segment_pause(),
//!     )?;
//!     scheduler.run().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod fetch;
pub mod scheduler;
pub mod segments;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use config::{Config, DisplaySettings, PlaylistEntry};
pub use display::TimedWriter;
pub use error::AppError;
pub use scheduler::{PlaylistScheduler, StepOutcome};
pub use segments::{FormatOptions, Segment, SegmentRegistry};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
