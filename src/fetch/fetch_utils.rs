//! HTTP fetching with status-code mapping and error classification

use crate::error::AppError;
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument};

/// Fetches a URL and returns the body as text.
///
/// Makes a single attempt. A failed fetch is retried only when the
/// segment's cache next goes stale.
///
/// # Arguments
/// * `client` - HTTP client for making requests
/// * `url` - URL to fetch
///
/// # Returns
/// * `Result<String, AppError>` - Response body or a classified error
#[instrument(skip(client))]
pub async fn fetch_text(client: &Client, url: &str) -> Result<String, AppError> {
    info!("Fetching data from URL: {url}");
    let response = send(client, url).await?;

    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read response text from URL {}: {}", url, e);
            return Err(AppError::ApiFetch(e));
        }
    };

    debug!("Response length: {} bytes", text.len());
    if text.trim().is_empty() {
        return Err(AppError::api_no_data("Response body is empty", url));
    }
    Ok(text)
}

/// Fetches a URL and parses the body as JSON.
#[instrument(skip(client))]
pub async fn fetch_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, AppError> {
    let text = fetch_text(client, url).await?;
    serde_json::from_str::<T>(&text).map_err(|e| {
        error!("Failed to parse response: {} (URL: {})", e, url);
        let preview: String = text.chars().take(200).collect();
        debug!("Response text (first 200 chars): {preview}");
        AppError::ApiParse(e)
    })
}

async fn send(client: &Client, url: &str) -> Result<Response, AppError> {
    let response = match client
        .get(url)
        .header(CACHE_CONTROL, "no-cache")
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            error!("Request failed for URL {}: {}", url, e);
            return if e.is_timeout() {
                Err(AppError::network_timeout(url))
            } else if e.is_connect() {
                Err(AppError::network_connection(url, e.to_string()))
            } else {
                Err(AppError::ApiFetch(e))
            };
        }
    };

    let status = response.status();
    debug!("Response status: {status}");

    if !status.is_success() {
        let status_code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or("Unknown error");

        error!("HTTP {} - {} (URL: {})", status_code, reason, url);

        return Err(match status_code {
            404 => AppError::api_not_found(url),
            429 => AppError::api_rate_limit(reason, url),
            400..=499 => AppError::api_client_error(status_code, reason, url),
            502 | 503 => AppError::api_service_unavailable(status_code, reason, url),
            _ => AppError::api_server_error(status_code, reason, url),
        });
    }

    Ok(response)
}
