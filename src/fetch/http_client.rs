//! HTTP client creation and configuration utilities

use crate::error::AppError;
use reqwest::Client;
use std::time::Duration;

/// User agent sent with every provider request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Creates the single HTTP client shared by every data source.
///
/// The timeout bounds how long one fetch may stall the feed; the pool keeps
/// connections to the handful of provider hosts alive between refreshes.
///
/// # Arguments
/// * `timeout_seconds` - Per-request timeout, from `http_timeout_seconds` in the config
///
/// # Returns
/// * `Result<Client, AppError>` - A configured reqwest client or error
pub fn create_http_client_with_timeout(timeout_seconds: u64) -> Result<Client, AppError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .pool_max_idle_per_host(crate::constants::HTTP_POOL_MAX_IDLE_PER_HOST)
        .user_agent(USER_AGENT)
        .build()
        .map_err(AppError::ApiFetch)
}

/// Creates an HTTP client for testing with default timeout
#[cfg(test)]
pub fn create_test_http_client() -> Client {
    create_http_client_with_timeout(crate::constants::DEFAULT_HTTP_TIMEOUT_SECONDS)
        .expect("Failed to create test HTTP client")
}
