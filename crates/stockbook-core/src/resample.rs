//! Daily-to-calendar-bucket OHLCV resampling.
//!
//! This is the one piece of real logic in the system: fold a stock's daily
//! bars into monthly, quarterly, or annual bars.

use crate::{AggregatedBar, DailyBar, Timeframe};

/// Resample daily bars into one [`AggregatedBar`] per populated calendar
/// bucket.
///
/// `bars` must be in ascending date order (the warehouse returns them that
/// way). Within each bucket: open is the first row's open, high the maximum
/// high, low the minimum low, close the last row's close, and volume the sum
/// of volumes. Buckets with no input rows produce no output row, so gaps in
/// the series (holidays, delistings) never surface as empty records.
pub fn resample(bars: &[DailyBar], timeframe: Timeframe) -> Vec<AggregatedBar> {
    let mut out: Vec<AggregatedBar> = Vec::new();

    for bar in bars {
        let period_end = timeframe.bucket_end(bar.date);
        match out.last_mut() {
            Some(current) if current.period_end == period_end => {
                current.high = current.high.max(bar.high);
                current.low = current.low.min(bar.low);
                current.close = bar.close;
                current.volume += bar.volume;
            }
            _ => out.push(AggregatedBar {
                period_end,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
            }),
        }
    }

    out
}
