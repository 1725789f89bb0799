//! Market-data provider contract.

pub mod yahoo;

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use time::Date;

use crate::{DailyBar, Ticker};

pub use yahoo::YahooHistory;

/// Error categories surfaced by provider adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    Internal,
}

/// Structured provider error. Per-stock failures carry one of these and are
/// logged by the fetch stage without aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SourceError {}

/// One ticker's fetched daily history.
///
/// `dropped_rows` counts provider rows discarded because at least one OHLCV
/// field was missing; discarding them is deliberate data-quality policy, and
/// the count keeps the policy visible in fetch output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyHistory {
    pub bars: Vec<DailyBar>,
    pub dropped_rows: usize,
}

/// Source of daily OHLCV history for a single ticker.
///
/// Implementations must be `Send + Sync`; the fetch stage drives them
/// sequentially, one ticker at a time.
pub trait DailyHistorySource: Send + Sync {
    /// Human-readable provider name used in progress output.
    fn name(&self) -> &'static str;

    /// Fetches daily bars from `start` through the present, ascending by
    /// date.
    ///
    /// An empty `bars` vector is not an error: it means the provider has no
    /// data for the ticker, and the caller skips the stock.
    fn daily_history<'a>(
        &'a self,
        ticker: &'a Ticker,
        start: Date,
    ) -> Pin<Box<dyn Future<Output = Result<DailyHistory, SourceError>> + Send + 'a>>;
}
