//! Major index quotes from Yahoo Finance's chart API

use super::{DataSource, fetch_json};
use crate::constants::NOT_AVAILABLE;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Symbols shown, in display order, with their short display names.
pub const INDEXES: [(&str, &str); 8] = [
    ("^GSPC", "S&P 500"),
    ("^DJI", "Dow Jones"),
    ("^IXIC", "NASDAQ"),
    ("^RUT", "Russell"),
    ("ES=F", "S&P Futures"),
    ("YM=F", "Dow Futures"),
    ("NQ=F", "NASDAQ Fut"),
    ("RTY=F", "Russell Fut"),
];

/// Quote for one index, already formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexQuote {
    pub symbol: String,
    pub name: String,
    pub price: String,
    pub delta: String,
    pub delta_pct: String,
}

impl IndexQuote {
    fn unavailable(symbol: &str, name: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price: NOT_AVAILABLE.to_string(),
            delta: NOT_AVAILABLE.to_string(),
            delta_pct: NOT_AVAILABLE.to_string(),
        }
    }

    /// Formats a quote from the current price and the previous close.
    pub fn from_prices(symbol: &str, name: &str, price: Option<f64>, previous_close: Option<f64>) -> Self {
        let mut quote = Self::unavailable(symbol, name);
        let Some(price) = price else {
            return quote;
        };
        quote.price = with_thousands(price);
        if let Some(previous) = previous_close.filter(|p| *p != 0.0) {
            let delta = price - previous;
            quote.delta = format!("{delta:+.2}");
            quote.delta_pct = format!("({:+.2}%)", delta / previous * 100.0);
        }
        quote
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    chart_previous_close: Option<f64>,
}

/// Chart endpoint queried once per index.
#[derive(Debug, Clone)]
pub struct YahooFinanceSource {
    client: Client,
    base_url: String,
}

impl YahooFinanceSource {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, crate::constants::urls::YAHOO_FINANCE)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, symbol: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}?interval=1d&range=1d",
            self.base_url,
            encode_symbol(symbol)
        )
    }

    async fn fetch_quote(&self, symbol: &str, name: &str) -> Result<IndexQuote, AppError> {
        let response: ChartResponse = fetch_json(&self.client, &self.url(symbol)).await?;
        let meta = response
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .map(|r| r.meta)
            .ok_or_else(|| AppError::api_no_data("chart has no result", self.url(symbol)))?;
        Ok(IndexQuote::from_prices(
            symbol,
            name,
            meta.regular_market_price,
            meta.chart_previous_close,
        ))
    }
}

#[async_trait]
impl DataSource for YahooFinanceSource {
    type Payload = Vec<IndexQuote>;

    fn describe(&self) -> String {
        format!("Yahoo Finance ({} indexes)", INDEXES.len())
    }

    /// Fetches every index. One failing symbol shows as `N/A`; only a total
    /// failure is an error.
    async fn fetch(&self) -> Result<Vec<IndexQuote>, AppError> {
        let mut quotes = Vec::with_capacity(INDEXES.len());
        let mut last_error = None;
        for (symbol, name) in INDEXES {
            match self.fetch_quote(symbol, name).await {
                Ok(quote) => quotes.push(quote),
                Err(e) => {
                    warn!("Quote for {} unavailable: {}", symbol, e);
                    quotes.push(IndexQuote::unavailable(symbol, name));
                    last_error = Some(e);
                }
            }
        }
        debug!("Fetched {} index quotes", quotes.len());
        match last_error {
            Some(e) if quotes.iter().all(|q| q.price == NOT_AVAILABLE) => Err(e),
            _ => Ok(quotes),
        }
    }
}

/// Percent-encodes the characters index symbols use in a URL path.
fn encode_symbol(symbol: &str) -> String {
    symbol.replace('^', "%5E").replace('=', "%3D")
}

/// Formats a price with two decimals and comma-grouped thousands.
pub fn with_thousands(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
