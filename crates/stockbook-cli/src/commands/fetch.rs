use time::Date;

use stockbook_core::{
    default_start_date, parse_iso_date, DailyBar, DailyHistorySource, Ticker, YahooHistory,
};
use stockbook_warehouse::{BarRow, Warehouse, WarehouseConfig};

use crate::cli::FetchArgs;
use crate::error::CliError;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub processed: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub async fn run(args: &FetchArgs, config: WarehouseConfig) -> Result<(), CliError> {
    let start = match &args.start {
        Some(value) => parse_iso_date(value)?,
        None => default_start_date(),
    };

    let warehouse = Warehouse::open_existing(config)?;
    let source = YahooHistory::new()?;
    let report = fetch_all(&warehouse, &source, start).await?;

    println!(
        "fetch complete: {} stocks processed, {} new rows inserted, {} skipped (no data), {} failed",
        report.processed, report.inserted, report.skipped, report.failed
    );
    Ok(())
}

/// Fetch and store history for every tracked stock, one at a time.
///
/// Provider failures and empty responses are per-stock soft errors: logged,
/// counted, and the loop moves on. Storage failures abort the stage.
pub async fn fetch_all(
    warehouse: &Warehouse,
    source: &dyn DailyHistorySource,
    start: Date,
) -> Result<FetchReport, CliError> {
    let stocks = warehouse.list_stocks()?;
    println!(
        "found {} stocks to process; requesting history from {} via {}",
        stocks.len(),
        start,
        source.name()
    );

    let mut report = FetchReport::default();
    for stock in &stocks {
        report.processed += 1;

        let ticker = match Ticker::parse(&stock.ticker) {
            Ok(ticker) => ticker,
            Err(error) => {
                eprintln!("{}: stored ticker is invalid: {error}", stock.ticker);
                report.failed += 1;
                continue;
            }
        };

        match source.daily_history(&ticker, start).await {
            Ok(history) if history.bars.is_empty() => {
                println!("{}: no data found, skipping", stock.ticker);
                report.skipped += 1;
            }
            Ok(history) => {
                let rows = to_bar_rows(&history.bars);
                let inserted = warehouse.insert_daily_bars(stock.id, &rows)?;
                report.inserted += inserted;
                if history.dropped_rows > 0 {
                    println!(
                        "{}: {} new rows ({} incomplete rows dropped)",
                        stock.ticker, inserted, history.dropped_rows
                    );
                } else {
                    println!("{}: {} new rows", stock.ticker, inserted);
                }
            }
            Err(error) => {
                eprintln!("{}: fetch failed: {error}", stock.ticker);
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

fn to_bar_rows(bars: &[DailyBar]) -> Vec<BarRow> {
    bars.iter()
        .map(|bar| BarRow {
            date: bar.date.to_string(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: i64::try_from(bar.volume).unwrap_or(i64::MAX),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::future::Future;
    use std::pin::Pin;

    use tempfile::tempdir;
    use time::Month;

    use stockbook_core::provider::{DailyHistory, SourceError};
    use stockbook_warehouse::StockSeed;

    struct ScriptedSource {
        responses: HashMap<String, Result<DailyHistory, SourceError>>,
    }

    impl DailyHistorySource for ScriptedSource {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn daily_history<'a>(
            &'a self,
            ticker: &'a Ticker,
            _start: Date,
        ) -> Pin<Box<dyn Future<Output = Result<DailyHistory, SourceError>> + Send + 'a>>
        {
            let response = self
                .responses
                .get(ticker.as_str())
                .cloned()
                .unwrap_or_else(|| Ok(DailyHistory::default()));
            Box::pin(async move { response })
        }
    }

    fn seeded_warehouse(dir: &std::path::Path, tickers: &[&str]) -> Warehouse {
        let warehouse = Warehouse::create(WarehouseConfig {
            home: dir.to_path_buf(),
            db_path: dir.join("stocks.duckdb"),
        })
        .expect("warehouse create");
        let seeds: Vec<StockSeed> = tickers
            .iter()
            .map(|ticker| StockSeed {
                ticker: ticker.to_string(),
                name: format!("{ticker} Ltd."),
            })
            .collect();
        warehouse.seed_roster(&seeds).expect("seed");
        warehouse
    }

    fn history(days: &[(u8, f64)]) -> DailyHistory {
        let bars = days
            .iter()
            .map(|&(day, close)| {
                let date =
                    Date::from_calendar_date(2021, Month::January, day).expect("valid date");
                DailyBar::new(date, close - 1.0, close + 1.0, close - 2.0, close, 100)
                    .expect("valid bar")
            })
            .collect();
        DailyHistory {
            bars,
            dropped_rows: 0,
        }
    }

    fn start() -> Date {
        Date::from_calendar_date(2010, Month::January, 1).expect("valid date")
    }

    #[tokio::test]
    async fn refetching_inserts_no_duplicate_rows() {
        let temp = tempdir().expect("tempdir");
        let warehouse = seeded_warehouse(temp.path(), &["TCS.NS"]);
        let source = ScriptedSource {
            responses: HashMap::from([(
                "TCS.NS".to_string(),
                Ok(history(&[(4, 11.0), (5, 12.0)])),
            )]),
        };

        let first = fetch_all(&warehouse, &source, start()).await.expect("first run");
        assert_eq!(first.inserted, 2);

        let second = fetch_all(&warehouse, &source, start())
            .await
            .expect("second run");
        assert_eq!(second.inserted, 0);
        assert_eq!(second.processed, 1);
    }

    #[tokio::test]
    async fn one_failing_stock_does_not_abort_the_batch() {
        let temp = tempdir().expect("tempdir");
        let warehouse = seeded_warehouse(temp.path(), &["BADCO.NS", "ITC.NS", "SBIN.NS"]);
        let source = ScriptedSource {
            responses: HashMap::from([
                (
                    "BADCO.NS".to_string(),
                    Err(SourceError::unavailable("provider exploded")),
                ),
                ("ITC.NS".to_string(), Ok(history(&[(4, 11.0)]))),
                ("SBIN.NS".to_string(), Ok(DailyHistory::default())),
            ]),
        };

        let report = fetch_all(&warehouse, &source, start()).await.expect("run");
        assert_eq!(report.processed, 3);
        assert_eq!(report.failed, 1);
        assert_eq!(report.inserted, 1);
        assert_eq!(report.skipped, 1);
    }

    #[tokio::test]
    async fn empty_history_skips_the_stock() {
        let temp = tempdir().expect("tempdir");
        let warehouse = seeded_warehouse(temp.path(), &["NTPC.NS"]);
        let source = ScriptedSource {
            responses: HashMap::new(),
        };

        let report = fetch_all(&warehouse, &source, start()).await.expect("run");
        assert_eq!(report.skipped, 1);
        assert_eq!(report.inserted, 0);

        let stocks = warehouse.list_stocks().expect("list");
        assert!(warehouse.daily_bars(stocks[0].id).expect("read").is_empty());
    }
}
