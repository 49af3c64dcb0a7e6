//! Top stories scraped from apnews.com

use super::html::{self, chunks_after_class};
use super::{DataSource, fetch_text};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

const HUB_PATH: &str = "/hub/ap-top-news";
const PROMO_CLASS: &str = "PagePromo-content";
const STORY_BODY_CLASS: &str = "RichTextStoryBody";

/// One story from the hub page.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsItem {
    pub headline: String,
    pub url: Option<String>,
    /// Paragraphs of the full story, when the article page could be read.
    pub story: Option<Vec<String>>,
}

impl NewsItem {
    /// Placeholder item used when the hub yields nothing.
    pub fn unavailable() -> Self {
        Self {
            headline: "*** Newsfeed Unavailable ***".to_string(),
            url: None,
            story: None,
        }
    }
}

/// AP top-news hub plus the article page behind each promo.
#[derive(Debug, Clone)]
pub struct ApNewsSource {
    client: Client,
    base_url: String,
    max_items: usize,
}

impl ApNewsSource {
    pub fn new(client: Client, max_items: usize) -> Self {
        Self::with_base_url(client, crate::constants::urls::AP_NEWS, max_items)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>, max_items: usize) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            max_items,
        }
    }

    fn absolute(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else {
            format!("{}/{}", self.base_url, href.trim_start_matches('/'))
        }
    }

    /// Fetches the story behind one promo. A story that cannot be read is `None`.
    async fn fetch_story(&self, url: &str) -> Option<Vec<String>> {
        match fetch_text(&self.client, url).await {
            Ok(page) => {
                let story = parse_story(&page);
                if story.is_none() {
                    debug!("No story body found at {url}");
                }
                story
            }
            Err(e) => {
                warn!("Failed to fetch story {}: {}", url, e);
                None
            }
        }
    }
}

#[async_trait]
impl DataSource for ApNewsSource {
    type Payload = Vec<NewsItem>;

    fn describe(&self) -> String {
        format!("AP News hub (up to {} items)", self.max_items)
    }

    /// Returns the promoted items, in hub order, each with its story when available.
    async fn fetch(&self) -> Result<Vec<NewsItem>, AppError> {
        let hub_url = format!("{}{}", self.base_url, HUB_PATH);
        let page = fetch_text(&self.client, &hub_url).await?;

        let mut items = Vec::new();
        for (headline, href) in parse_promos(&page, self.max_items) {
            let url = self.absolute(&href);
            let story = self.fetch_story(&url).await;
            items.push(NewsItem {
                headline,
                url: Some(url),
                story,
            });
        }
        debug!("Parsed {} news items from {}", items.len(), hub_url);
        Ok(items)
    }
}

/// Headline and link of each promo on the hub page, up to `limit`.
pub fn parse_promos(page: &str, limit: usize) -> Vec<(String, String)> {
    chunks_after_class(page, PROMO_CLASS)
        .into_iter()
        .filter_map(|chunk| {
            let anchor = html::anchors(chunk).into_iter().find(|a| a.has_class("Link"))?;
            let href = anchor.attribute("href")?.to_string();
            let headline = html::to_text(&anchor.inner);
            (!headline.is_empty()).then_some((headline, href))
        })
        .take(limit)
        .collect()
}

/// Paragraphs of an article page's story body.
pub fn parse_story(page: &str) -> Option<Vec<String>> {
    let start = page.find(STORY_BODY_CLASS)?;
    let paragraphs = html::paragraphs(&page[start..]);
    (!paragraphs.is_empty()).then_some(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::http_client::create_test_http_client;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn promo(href: &str, headline: &str) -> String {
        format!(
            r#"<div class="PagePromo-content"><div class="PagePromo-title"><a class="Link " href="{href}"><span class="PagePromoContentIcons-text">{headline}</span></a></div></div>"#
        )
    }

    fn hub(promos: &[String]) -> String {
        format!("<html><body><nav><a class=\"Link\" href=\"/nav\">Menu</a></nav>{}</body></html>", promos.join(""))
    }

    #[test]
    fn test_parse_promos_skips_page_chrome() {
        let page = hub(&[
            promo("https://apnews.com/article/one", "Markets rally &amp; bonds slip"),
            promo("/article/two", "Storm heads east"),
        ]);
        let promos = parse_promos(&page, 15);
        assert_eq!(
            promos,
            vec![
                ("Markets rally & bonds slip".to_string(), "https://apnews.com/article/one".to_string()),
                ("Storm heads east".to_string(), "/article/two".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_promos_respects_limit() {
        let promos: Vec<String> = (0..5).map(|i| promo(&format!("/a/{i}"), &format!("Story {i}"))).collect();
        assert_eq!(parse_promos(&hub(&promos), 3).len(), 3);
    }

    #[test]
    fn test_parse_story() {
        let page = r#"<p>Ad text</p><div class="RichTextStoryBody RichTextBody"><p>WASHINGTON (AP) &mdash; Lead.</p><div class="ad"></div><p>Second.</p></div>"#;
        assert_eq!(
            parse_story(page),
            Some(vec!["WASHINGTON (AP) - Lead.".to_string(), "Second.".to_string()])
        );
        assert_eq!(parse_story("<p>No body here</p>"), None);
    }

    #[tokio::test]
    async fn test_fetch_follows_story_links() {
        let server = MockServer::start().await;
        let page = hub(&[promo("/article/one", "First"), promo("/article/two", "Second")]);
        Mock::given(method("GET"))
            .and(path("/hub/ap-top-news"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/article/one"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<div class="RichTextStoryBody"><p>Para one.</p><p>Para two.</p></div>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/article/two"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let source = ApNewsSource::with_base_url(create_test_http_client(), server.uri(), 15);
        let items = source.fetch().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].headline, "First");
        assert_eq!(
            items[0].story.as_deref(),
            Some(&["Para one.".to_string(), "Para two.".to_string()][..])
        );
        assert_eq!(items[1].url.as_deref(), Some(format!("{}/article/two", server.uri()).as_str()));
        assert!(items[1].story.is_none());
    }
}
