use time::Date;

use crate::{Ticker, ValidationError};

/// A tracked stock: ticker plus display name. Seeded once, immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockListing {
    pub ticker: Ticker,
    pub name: String,
}

impl StockListing {
    pub fn new(ticker: Ticker, name: impl Into<String>) -> Self {
        Self {
            ticker,
            name: name.into(),
        }
    }
}

/// One trading day's OHLCV summary for a single stock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyBar {
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl DailyBar {
    pub fn new(
        date: Date,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// OHLCV bar spanning a calendar bucket, labeled with the bucket's end date.
///
/// Derived from daily bars on demand; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatedBar {
    pub period_end: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn date(year: i32, month: Month, day: u8) -> Date {
        Date::from_calendar_date(year, month, day).expect("valid test date")
    }

    #[test]
    fn builds_valid_daily_bar() {
        let bar = DailyBar::new(date(2021, Month::January, 4), 10.0, 12.0, 9.0, 11.0, 100)
            .expect("bar should validate");
        assert_eq!(bar.volume, 100);
    }

    #[test]
    fn rejects_negative_price() {
        let err = DailyBar::new(date(2021, Month::January, 4), -1.0, 12.0, 9.0, 11.0, 100)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::NegativeValue { field: "open" }));
    }

    #[test]
    fn rejects_high_below_low() {
        let err = DailyBar::new(date(2021, Month::January, 4), 10.0, 8.0, 9.0, 8.5, 100)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarRange));
    }

    #[test]
    fn rejects_close_outside_range() {
        let err = DailyBar::new(date(2021, Month::January, 4), 10.0, 12.0, 9.0, 13.0, 100)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarBounds));
    }

    #[test]
    fn rejects_non_finite_value() {
        let err = DailyBar::new(
            date(2021, Month::January, 4),
            f64::NAN,
            12.0,
            9.0,
            11.0,
            100,
        )
        .expect_err("must fail");
        assert!(matches!(err, ValidationError::NonFiniteValue { field: "open" }));
    }
}
