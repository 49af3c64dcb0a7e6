//! Wikipedia's selected anniversaries for today

use super::{DataSource, fetch_json};
use crate::display::clean_chars;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::sync::LazyLock;

/// Parenthetical references to page media, e.g. "(pictured)" or "(portrait depicted)".
static MEDIA_NOTE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i) \([^)]*(pictured|depicted|featured)\)").unwrap());

/// Anniversaries for one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct OnThisDay {
    /// Day in "October 19" form.
    pub label: String,
    /// Events as "year - text", newest first.
    pub items: Vec<String>,
}

/// Formats a date the way the header shows it: full month, unpadded day.
pub fn day_label(date: NaiveDate) -> String {
    date.format("%B %-d").to_string()
}

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(default)]
    selected: Vec<SelectedEvent>,
}

#[derive(Debug, Deserialize)]
struct SelectedEvent {
    text: String,
    year: Option<i32>,
}

/// Wikimedia REST feed of selected anniversaries.
#[derive(Debug, Clone)]
pub struct WikipediaSource {
    client: Client,
    base_url: String,
}

impl WikipediaSource {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, crate::constants::urls::WIKIPEDIA)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, date: NaiveDate) -> String {
        format!(
            "{}/api/rest_v1/feed/onthisday/selected/{:02}/{:02}",
            self.base_url,
            date.month(),
            date.day()
        )
    }

    /// Fetches the anniversaries for a specific day.
    pub async fn fetch_for(&self, date: NaiveDate) -> Result<OnThisDay, AppError> {
        let feed: Feed = fetch_json(&self.client, &self.url(date)).await?;
        Ok(OnThisDay {
            label: day_label(date),
            items: build_items(feed.selected),
        })
    }
}

#[async_trait]
impl DataSource for WikipediaSource {
    type Payload = OnThisDay;

    fn describe(&self) -> String {
        "Wikipedia On This Day".to_string()
    }

    async fn fetch(&self) -> Result<OnThisDay, AppError> {
        self.fetch_for(Local::now().date_naive()).await
    }
}

fn build_items(events: Vec<SelectedEvent>) -> Vec<String> {
    let mut events: Vec<(Option<i32>, String)> = events
        .into_iter()
        .map(|e| (e.year, remove_media_notes(&clean_chars(&e.text))))
        .filter(|(_, text)| !text.is_empty())
        .collect();
    events.sort_by(|a, b| b.0.cmp(&a.0));
    events
        .into_iter()
        .map(|(year, text)| match year {
            Some(year) => format!("{year} - {text}"),
            None => text,
        })
        .collect()
}

/// Strips parentheticals that only make sense next to the page's pictures.
pub fn remove_media_notes(text: &str) -> String {
    MEDIA_NOTE_REGEX.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::http_client::create_test_http_client;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_day_label() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 9).unwrap();
        assert_eq!(day_label(date), "October 9");
    }

    #[test]
    fn test_remove_media_notes() {
        assert_eq!(
            remove_media_notes("The Eiffel Tower (pictured) opens."),
            "The Eiffel Tower opens."
        );
        assert_eq!(
            remove_media_notes("A ship (example Depicted) sails (quietly)."),
            "A ship sails (quietly)."
        );
        assert_eq!(remove_media_notes("Nothing to remove"), "Nothing to remove");
    }

    #[test]
    fn test_items_are_newest_first() {
        let items = build_items(vec![
            SelectedEvent {
                text: "Old event".to_string(),
                year: Some(1781),
            },
            SelectedEvent {
                text: "New event (featured)".to_string(),
                year: Some(1987),
            },
            SelectedEvent {
                text: "Middle \u{2013} event".to_string(),
                year: Some(1900),
            },
        ]);
        assert_eq!(
            items,
            vec!["1987 - New event", "1900 - Middle - event", "1781 - Old event"]
        );
    }

    #[tokio::test]
    async fn test_fetch_for_date() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/rest_v1/feed/onthisday/selected/10/19"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "selected": [
                    { "text": "Cornwallis surrenders at Yorktown.", "year": 1781, "pages": [] },
                    { "text": "Black Monday (pictured) hits markets.", "year": 1987, "pages": [] }
                ]
            })))
            .mount(&server)
            .await;

        let source = WikipediaSource::with_base_url(create_test_http_client(), server.uri());
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let day = source.fetch_for(date).await.unwrap();
        assert_eq!(day.label, "October 19");
        assert_eq!(
            day.items,
            vec![
                "1987 - Black Monday hits markets.",
                "1781 - Cornwallis surrenders at Yorktown."
            ]
        );
    }
}
