//! Data sources: the network side of every data-backed segment.
//!
//! Each provider has a source type implementing [`DataSource`]. Segments are
//! generic over their source so tests can swap in a scripted one.

pub mod fetch_utils;
pub mod html;
pub mod http_client;
pub mod news;
pub mod on_this_day;
pub mod station;
pub mod stocks;
pub mod weather;

pub use fetch_utils::{fetch_json, fetch_text};
pub use http_client::create_http_client_with_timeout;

use crate::error::AppError;
use async_trait::async_trait;

/// Uniform fetch contract: produce one complete payload or fail.
#[async_trait]
pub trait DataSource: Send + Sync {
    type Payload: Send;

    /// Short description of where the data comes from, for logs.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Self::Payload, AppError>;
}
