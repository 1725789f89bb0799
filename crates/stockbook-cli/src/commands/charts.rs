use std::path::Path;

use stockbook_charts::{chart_path, ensure_chart_dirs, render_candlestick};
use stockbook_core::{parse_iso_date, resample, DailyBar, Ticker, Timeframe, ValidationError};
use stockbook_warehouse::{BarRow, StockSeries, Warehouse, WarehouseConfig};

use crate::cli::ChartsArgs;
use crate::error::CliError;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ChartReport {
    pub written: usize,
    pub skipped_stocks: usize,
    pub failed: usize,
}

pub fn run(args: &ChartsArgs, config: WarehouseConfig) -> Result<(), CliError> {
    let warehouse = Warehouse::open_existing(config)?;
    let report = generate_all(&warehouse, &args.output_dir)?;
    println!(
        "charts complete: {} written, {} stocks skipped (no data), {} failed",
        report.written, report.skipped_stocks, report.failed
    );
    Ok(())
}

/// Resample every stock's stored history and write one chart per populated
/// (stock, timeframe) pair.
///
/// Stocks without history are skipped with a log line; a failure on one
/// stock or timeframe is logged and the rest still render.
pub fn generate_all(warehouse: &Warehouse, output_dir: &Path) -> Result<ChartReport, CliError> {
    let dataset = warehouse.load_dataset()?;
    println!(
        "loaded {} stocks ({} daily rows) from {}",
        dataset.len(),
        dataset.iter().map(|series| series.bars.len()).sum::<usize>(),
        warehouse.db_path().display()
    );

    ensure_chart_dirs(output_dir)?;

    let mut report = ChartReport::default();
    for series in &dataset {
        if series.bars.is_empty() {
            println!("{}: no stored history, skipping charts", series.ticker);
            report.skipped_stocks += 1;
            continue;
        }

        let (ticker, daily) = match decode_series(series) {
            Ok(decoded) => decoded,
            Err(error) => {
                eprintln!("{}: stored series is invalid: {error}", series.ticker);
                report.failed += 1;
                continue;
            }
        };

        for timeframe in Timeframe::ALL {
            let aggregated = resample(&daily, timeframe);
            if aggregated.is_empty() {
                continue;
            }

            let path = chart_path(output_dir, timeframe, &ticker);
            match render_candlestick(&path, &ticker, &series.name, timeframe, &aggregated) {
                Ok(()) => {
                    println!("saved chart: {}", path.display());
                    report.written += 1;
                }
                Err(error) => {
                    eprintln!("{} ({timeframe}): chart failed: {error}", series.ticker);
                    report.failed += 1;
                }
            }
        }
    }

    Ok(report)
}

fn decode_series(series: &StockSeries) -> Result<(Ticker, Vec<DailyBar>), CliError> {
    let ticker = Ticker::parse(&series.ticker)?;
    let daily = series
        .bars
        .iter()
        .map(decode_bar)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((ticker, daily))
}

fn decode_bar(row: &BarRow) -> Result<DailyBar, CliError> {
    let date = parse_iso_date(&row.date)?;
    let volume =
        u64::try_from(row.volume).map_err(|_| ValidationError::NegativeValue { field: "volume" })?;
    Ok(DailyBar::new(
        date, row.open, row.high, row.low, row.close, volume,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    use stockbook_warehouse::StockSeed;

    fn bar(date: &str, close: f64) -> BarRow {
        BarRow {
            date: date.to_string(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1000,
        }
    }

    fn seeded_warehouse(dir: &Path) -> Warehouse {
        let warehouse = Warehouse::create(WarehouseConfig {
            home: dir.to_path_buf(),
            db_path: dir.join("stocks.duckdb"),
        })
        .expect("warehouse create");
        warehouse
            .seed_roster(&[
                StockSeed {
                    ticker: "ITC.NS".to_string(),
                    name: "ITC Ltd.".to_string(),
                },
                StockSeed {
                    ticker: "NTPC.NS".to_string(),
                    name: "NTPC Ltd.".to_string(),
                },
            ])
            .expect("seed");
        warehouse
    }

    #[test]
    fn writes_one_chart_per_timeframe_for_stocks_with_history() {
        let temp = tempdir().expect("tempdir");
        let warehouse = seeded_warehouse(temp.path());
        let itc = warehouse.list_stocks().expect("list")[0].clone();
        warehouse
            .insert_daily_bars(
                itc.id,
                &[
                    bar("2021-01-04", 11.0),
                    bar("2021-01-29", 14.0),
                    bar("2021-04-05", 13.0),
                ],
            )
            .expect("insert");

        let out = temp.path().join("charts");
        let report = generate_all(&warehouse, &out).expect("generate");

        assert_eq!(report.written, 3);
        assert_eq!(report.skipped_stocks, 1);
        assert_eq!(report.failed, 0);
        for timeframe in Timeframe::ALL {
            assert!(out
                .join(timeframe.as_str())
                .join("ITC.NS.html")
                .is_file());
        }
    }

    #[test]
    fn stocks_without_history_produce_no_chart_files() {
        let temp = tempdir().expect("tempdir");
        let warehouse = seeded_warehouse(temp.path());

        let out = temp.path().join("charts");
        let report = generate_all(&warehouse, &out).expect("generate");

        assert_eq!(report.written, 0);
        assert_eq!(report.skipped_stocks, 2);
        for timeframe in Timeframe::ALL {
            let dir = out.join(timeframe.as_str());
            assert!(dir.is_dir());
            let entries = std::fs::read_dir(&dir).expect("read dir").count();
            assert_eq!(entries, 0);
        }
    }

    #[test]
    fn negative_stored_volume_fails_the_stock_without_stopping_others() {
        let temp = tempdir().expect("tempdir");
        let warehouse = seeded_warehouse(temp.path());
        let stocks = warehouse.list_stocks().expect("list");
        let mut corrupt = bar("2021-01-04", 11.0);
        corrupt.volume = -50;
        warehouse
            .insert_daily_bars(stocks[0].id, &[corrupt])
            .expect("insert corrupt");
        warehouse
            .insert_daily_bars(stocks[1].id, &[bar("2021-01-04", 21.0)])
            .expect("insert clean");

        let out = temp.path().join("charts");
        let report = generate_all(&warehouse, &out).expect("generate");

        assert_eq!(report.failed, 1);
        assert_eq!(report.written, 3);
        for timeframe in Timeframe::ALL {
            assert!(!out
                .join(timeframe.as_str())
                .join("ITC.NS.html")
                .exists());
            assert!(out
                .join(timeframe.as_str())
                .join("NTPC.NS.html")
                .is_file());
        }
    }

    #[test]
    fn rerun_overwrites_chart_files_in_place() {
        let temp = tempdir().expect("tempdir");
        let warehouse = seeded_warehouse(temp.path());
        let itc = warehouse.list_stocks().expect("list")[0].clone();
        warehouse
            .insert_daily_bars(itc.id, &[bar("2021-01-04", 11.0)])
            .expect("insert");

        let out = temp.path().join("charts");
        generate_all(&warehouse, &out).expect("first run");
        let report = generate_all(&warehouse, &out).expect("second run");

        assert_eq!(report.written, 3);
        let monthly: Vec<_> = std::fs::read_dir(out.join("monthly"))
            .expect("read dir")
            .collect();
        assert_eq!(monthly.len(), 1);
    }
}
