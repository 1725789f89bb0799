//! Core contracts for stockbook.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - The OHLCV resampling algorithm (daily bars into calendar buckets)
//! - The tracked-stock roster and history defaults
//! - The market-data provider trait and the Yahoo Finance adapter

pub mod domain;
pub mod error;
pub mod provider;
pub mod resample;
pub mod roster;
pub mod timeframe;

pub use domain::{parse_iso_date, AggregatedBar, DailyBar, StockListing, Ticker};
pub use error::ValidationError;
pub use provider::{DailyHistory, DailyHistorySource, SourceError, SourceErrorKind, YahooHistory};
pub use resample::resample;
pub use roster::{default_roster, default_start_date};
pub use timeframe::Timeframe;
