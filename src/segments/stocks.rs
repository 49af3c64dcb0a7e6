//! Major US index quotes

use super::{
    FormatOptions, RefreshUnit, Segment, SegmentContext, SegmentInit, StalenessCache, Timestamped,
    fetch_or_sentinel,
};
use crate::constants::refresh::FINANCE_MINUTES;
use crate::display::{TimedWriter, format_time};
use crate::error::AppError;
use crate::fetch::DataSource;
use crate::fetch::stocks::{IndexQuote, YahooFinanceSource};
use async_trait::async_trait;
use chrono::{DateTime, Local};

const INTRO: &str = "Financial info from finance.yahoo.com";

#[derive(Debug, Clone)]
pub struct StocksData {
    pub fetched_at: DateTime<Local>,
    pub quotes: Vec<IndexQuote>,
}

impl Timestamped for StocksData {
    fn fetched_at(&self) -> DateTime<Local> {
        self.fetched_at
    }
}

/// Name and price on one line, change and percent change indented beneath.
pub fn quote_lines(quote: &IndexQuote) -> [String; 2] {
    [
        format!("    {:11}  {:>9}", quote.name, quote.price),
        format!("{:20}{} {}", "", quote.delta, quote.delta_pct),
    ]
}

pub struct StocksSegment<S = YahooFinanceSource> {
    name: String,
    intro: Option<String>,
    source: S,
    cache: StalenessCache<StocksData>,
}

impl StocksSegment<YahooFinanceSource> {
    pub fn from_context(ctx: &SegmentContext<'_>) -> Result<Self, AppError> {
        let init = SegmentInit::resolve(
            ctx.name,
            ctx.options,
            FINANCE_MINUTES,
            RefreshUnit::Minutes,
            Some(INTRO),
        )?;
        let source = YahooFinanceSource::new(ctx.client.clone());
        Ok(Self::with_source(ctx.name, init, source))
    }
}

impl<S: DataSource<Payload = Vec<IndexQuote>>> StocksSegment<S> {
    pub fn with_source(name: &str, init: SegmentInit, source: S) -> Self {
        Self {
            name: name.to_string(),
            intro: init.intro,
            source,
            cache: StalenessCache::new(init.refresh),
        }
    }
}

#[async_trait]
impl<S: DataSource<Payload = Vec<IndexQuote>>> Segment for StocksSegment<S> {
    fn introduction(&self) -> Option<&str> {
        self.intro.as_deref()
    }

    fn is_stale(&self) -> bool {
        self.cache.is_stale()
    }

    fn update_message(&self) -> &str {
        "Updating Financial Data"
    }

    async fn refresh(&mut self) {
        let quotes = fetch_or_sentinel(&self.name, &self.source, Vec::new).await;
        self.cache.store(StocksData {
            fetched_at: Local::now(),
            quotes,
        });
    }

    async fn show(&mut self, out: &mut TimedWriter, _format: &FormatOptions) {
        out.header("Stocks", "$").await;
        out.newline().await;
        let Some(data) = self.cache.payload() else {
            return;
        };
        if data.quotes.is_empty() {
            out.write("No market data available").await;
            return;
        }
        let use_24 = out.settings().prefer_24hr_time;
        out.write(&format!("As of {}", format_time(&data.fetched_at, use_24)))
            .await;
        for quote in &data.quotes {
            out.newline().await;
            for line in quote_lines(quote) {
                out.write(&line).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::{MockSource, buffered_writer, instant_settings};
    use chrono::TimeDelta;

    fn init() -> SegmentInit {
        SegmentInit {
            refresh: TimeDelta::minutes(15),
            intro: None,
        }
    }

    #[test]
    fn test_quote_lines_align() {
        let quote = IndexQuote::from_prices("^GSPC", "S&P 500", Some(5800.0), Some(5750.0));
        let [top, bottom] = quote_lines(&quote);
        assert_eq!(top, "    S&P 500       5,800.00");
        assert_eq!(bottom, format!("{}+50.00 (+0.87%)", " ".repeat(20)));
    }

    #[tokio::test]
    async fn test_render_quotes() {
        let quotes = vec![
            IndexQuote::from_prices("^GSPC", "S&P 500", Some(5800.0), Some(5750.0)),
            IndexQuote::from_prices("^DJI", "Dow Jones", None, None),
        ];
        let (mut out, buffer) = buffered_writer(instant_settings());
        let mut segment = StocksSegment::with_source("stocks", init(), MockSource::new([Some(quotes)]));
        segment.render(&mut out, &FormatOptions::default()).await;

        let lines = buffer.lines();
        assert_eq!(lines[0], "[UPDATING FINANCIAL DATA...]");
        assert!(lines[1].contains("  STOCKS  "));
        assert!(lines[2].starts_with("AS OF "));
        assert!(lines.contains(&"    DOW JONES          N/A".to_string()));
        assert!(lines.iter().any(|l| l.trim() == "N/A N/A"));
    }

    #[tokio::test]
    async fn test_failure_shows_no_data_line() {
        let (mut out, buffer) = buffered_writer(instant_settings());
        let mut segment =
            StocksSegment::with_source("stocks", init(), MockSource::<Vec<IndexQuote>>::failing());
        segment.render(&mut out, &FormatOptions::default()).await;
        assert!(buffer.lines().contains(&"NO MARKET DATA AVAILABLE".to_string()));
        assert!(!segment.is_stale());
    }
}
