//! Yahoo Finance chart API adapter.
//!
//! Uses the public v8 chart endpoint, which serves full daily history without
//! the crumb handshake the quote endpoints require.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::provider::{DailyHistory, DailyHistorySource, SourceError};
use crate::{DailyBar, Ticker};

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0";

/// Daily history source backed by Yahoo Finance.
#[derive(Debug, Clone)]
pub struct YahooHistory {
    client: reqwest::Client,
}

impl YahooHistory {
    pub fn new() -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|error| {
                SourceError::internal(format!("failed to build http client: {error}"))
            })?;
        Ok(Self { client })
    }

    fn history_url(ticker: &Ticker, start: Date) -> String {
        let period1 = start.midnight().assume_utc().unix_timestamp();
        let period2 = OffsetDateTime::now_utc().unix_timestamp();
        format!(
            "{}/{}?period1={}&period2={}&interval=1d&events=history",
            CHART_BASE_URL,
            urlencoding::encode(ticker.as_str()),
            period1,
            period2,
        )
    }

    async fn fetch(&self, ticker: &Ticker, start: Date) -> Result<DailyHistory, SourceError> {
        let url = Self::history_url(ticker, start);
        let response = self
            .client
            .get(&url)
            .header("referer", "https://finance.yahoo.com/")
            .send()
            .await
            .map_err(|error| {
                SourceError::unavailable(format!("yahoo transport error: {error}"))
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(SourceError::rate_limited("yahoo rate limit hit (429)"));
        }
        if !status.is_success() {
            return Err(SourceError::unavailable(format!(
                "yahoo returned status {status}"
            )));
        }

        let body = response.text().await.map_err(|error| {
            SourceError::unavailable(format!("failed to read yahoo response: {error}"))
        })?;

        parse_chart_response(&body)
    }
}

impl DailyHistorySource for YahooHistory {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn daily_history<'a>(
        &'a self,
        ticker: &'a Ticker,
        start: Date,
    ) -> Pin<Box<dyn Future<Output = Result<DailyHistory, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch(ticker, start))
    }
}

/// Parse a chart API response body into daily bars.
///
/// Rows missing any of open/high/low/close/volume are dropped and counted in
/// [`DailyHistory::dropped_rows`] rather than surfaced as errors; so are rows
/// that fail bar validation. An empty result set parses to an empty history.
fn parse_chart_response(body: &str) -> Result<DailyHistory, SourceError> {
    let chart_response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|error| SourceError::internal(format!("failed to parse yahoo chart: {error}")))?;

    if let Some(error) = &chart_response.chart.error {
        let code = error.code.as_deref().unwrap_or("unknown");
        let description = error.description.as_deref().unwrap_or("no description");
        return Err(SourceError::unavailable(format!(
            "yahoo chart API error: {code}: {description}"
        )));
    }

    let Some(result) = chart_response.chart.result.first() else {
        return Ok(DailyHistory::default());
    };

    let Some(timestamps) = result.timestamp.as_deref() else {
        return Ok(DailyHistory::default());
    };

    let Some(quote) = result.indicators.quote.first() else {
        return Ok(DailyHistory::default());
    };

    let mut history = DailyHistory::default();
    for (index, &ts_value) in timestamps.iter().enumerate() {
        let ts = OffsetDateTime::from_unix_timestamp(ts_value)
            .map_err(|error| SourceError::internal(format!("invalid timestamp: {error}")))?;
        // Daily candles are stamped at session open; the UTC calendar date of
        // that instant is the trading date for NSE symbols.
        let date = ts.date();

        let row = (
            field_at(&quote.open, index),
            field_at(&quote.high, index),
            field_at(&quote.low, index),
            field_at(&quote.close, index),
            field_at(&quote.volume, index),
        );

        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = row else {
            history.dropped_rows += 1;
            continue;
        };

        if volume < 0 {
            history.dropped_rows += 1;
            continue;
        }

        match DailyBar::new(date, open, high, low, close, volume as u64) {
            Ok(bar) => history.bars.push(bar),
            Err(_) => history.dropped_rows += 1,
        }
    }

    Ok(history)
}

fn field_at<T: Copy>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).copied().flatten()
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Vec<YahooChartResult>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}
