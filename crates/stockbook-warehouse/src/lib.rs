//! DuckDB-backed store for the tracked-stock roster and daily OHLCV rows.
//!
//! The database file is the only durable resource shared between stages.
//! Each stage constructs one [`Warehouse`], works through it, and drops it;
//! the connection closes with the value. All writes are insert-if-absent, so
//! re-running any stage is safe.

pub mod migrations;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use duckdb::{params, Connection};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error(transparent)]
    DuckDb(#[from] duckdb::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("database file not found at {path}")]
    MissingDatabase { path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    pub home: PathBuf,
    pub db_path: PathBuf,
}

impl WarehouseConfig {
    pub fn at_db_path(db_path: PathBuf) -> Self {
        let home = db_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self { home, db_path }
    }
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        let home = resolve_home();
        let db_path = home.join("nse_stocks.duckdb");
        Self { home, db_path }
    }
}

/// A stock roster entry to seed, keyed by ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockSeed {
    pub ticker: String,
    pub name: String,
}

/// A seeded stock as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRow {
    pub id: i64,
    pub ticker: String,
    pub name: String,
}

/// One daily OHLCV row at the storage boundary; `date` is `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq)]
pub struct BarRow {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// One stock's full stored history, bars ascending by date.
#[derive(Debug, Clone, PartialEq)]
pub struct StockSeries {
    pub ticker: String,
    pub name: String,
    pub bars: Vec<BarRow>,
}

#[derive(Debug)]
pub struct Warehouse {
    config: WarehouseConfig,
    connection: Connection,
}

impl Warehouse {
    /// Open the database file, creating it and its schema if absent.
    pub fn create(config: WarehouseConfig) -> Result<Self, WarehouseError> {
        if let Some(parent) = config.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let connection = Connection::open(&config.db_path)?;
        migrations::apply_migrations(&connection)?;
        Ok(Self { config, connection })
    }

    /// Open an existing database file; fails fast when it does not exist so
    /// the fetch and chart stages can tell the user to initialize first.
    pub fn open_existing(config: WarehouseConfig) -> Result<Self, WarehouseError> {
        if !config.db_path.exists() {
            return Err(WarehouseError::MissingDatabase {
                path: config.db_path.clone(),
            });
        }

        let connection = Connection::open(&config.db_path)?;
        Ok(Self { config, connection })
    }

    pub fn db_path(&self) -> &Path {
        &self.config.db_path
    }

    /// Insert roster entries, skipping tickers already present. Returns the
    /// number of newly inserted rows.
    pub fn seed_roster(&self, roster: &[StockSeed]) -> Result<usize, WarehouseError> {
        self.connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<usize, WarehouseError> {
            let mut inserted = 0;
            for seed in roster {
                inserted += self.connection.execute(
                    "INSERT OR IGNORE INTO stocks (ticker, company_name) VALUES (?, ?)",
                    params![seed.ticker, seed.name],
                )?;
            }
            Ok(inserted)
        })();

        self.finalize_transaction(result)
    }

    pub fn list_stocks(&self) -> Result<Vec<StockRow>, WarehouseError> {
        let mut statement = self
            .connection
            .prepare("SELECT id, ticker, company_name FROM stocks ORDER BY id")?;
        let rows = statement.query_map([], |row| {
            Ok(StockRow {
                id: row.get(0)?,
                ticker: row.get(1)?,
                name: row.get(2)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Insert daily bars for one stock, skipping (stock, date) pairs already
    /// present. The whole batch commits or rolls back together, so a failed
    /// stock never leaves half its history behind. Returns the number of
    /// newly inserted rows.
    pub fn insert_daily_bars(
        &self,
        stock_id: i64,
        rows: &[BarRow],
    ) -> Result<usize, WarehouseError> {
        self.connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<usize, WarehouseError> {
            let mut inserted = 0;
            for row in rows {
                inserted += self.connection.execute(
                    r#"
INSERT OR IGNORE INTO stock_data (stock_id, date, open, high, low, close, volume)
VALUES (?, CAST(? AS DATE), ?, ?, ?, ?, ?)
"#,
                    params![
                        stock_id, row.date, row.open, row.high, row.low, row.close, row.volume
                    ],
                )?;
            }
            Ok(inserted)
        })();

        self.finalize_transaction(result)
    }

    /// One stock's stored bars, ascending by date.
    pub fn daily_bars(&self, stock_id: i64) -> Result<Vec<BarRow>, WarehouseError> {
        let mut statement = self.connection.prepare(
            r#"
SELECT CAST(date AS VARCHAR), open, high, low, close, volume
FROM stock_data
WHERE stock_id = ?
ORDER BY date
"#,
        )?;
        let rows = statement.query_map(params![stock_id], |row| {
            Ok(BarRow {
                date: row.get(0)?,
                open: row.get(1)?,
                high: row.get(2)?,
                low: row.get(3)?,
                close: row.get(4)?,
                volume: row.get(5)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Every tracked stock with its full history in one ordered pass.
    ///
    /// Stocks without any bars appear with an empty series so the chart
    /// stage can log the skip instead of silently losing them.
    pub fn load_dataset(&self) -> Result<Vec<StockSeries>, WarehouseError> {
        let mut statement = self.connection.prepare(
            r#"
SELECT
    s.ticker,
    s.company_name,
    CAST(d.date AS VARCHAR),
    d.open,
    d.high,
    d.low,
    d.close,
    d.volume
FROM stocks s
LEFT JOIN stock_data d ON d.stock_id = s.id
ORDER BY s.ticker, d.date
"#,
        )?;

        let rows = statement.query_map([], |row| {
            let date: Option<String> = row.get(2)?;
            let bar = match date {
                Some(date) => Some(BarRow {
                    date,
                    open: row.get(3)?,
                    high: row.get(4)?,
                    low: row.get(5)?,
                    close: row.get(6)?,
                    volume: row.get(7)?,
                }),
                None => None,
            };
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, bar))
        })?;

        let mut dataset: Vec<StockSeries> = Vec::new();
        for row in rows {
            let (ticker, name, bar) = row?;
            match dataset.last_mut() {
                Some(series) if series.ticker == ticker => {
                    if let Some(bar) = bar {
                        series.bars.push(bar);
                    }
                }
                _ => dataset.push(StockSeries {
                    ticker,
                    name,
                    bars: bar.into_iter().collect(),
                }),
            }
        }

        Ok(dataset)
    }

    fn finalize_transaction<T>(
        &self,
        result: Result<T, WarehouseError>,
    ) -> Result<T, WarehouseError> {
        match result {
            Ok(value) => {
                self.connection.execute_batch("COMMIT")?;
                Ok(value)
            }
            Err(error) => {
                let _ = self.connection.execute_batch("ROLLBACK");
                Err(error)
            }
        }
    }
}

fn resolve_home() -> PathBuf {
    if let Some(path) = env::var_os("STOCKBOOK_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".stockbook");
    }

    PathBuf::from(".stockbook")
}
