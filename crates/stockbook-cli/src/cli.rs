use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "stockbook",
    about = "Daily NSE stock history with aggregated candlestick charts",
    version
)]
pub struct Cli {
    /// Database file path (defaults to $STOCKBOOK_HOME/nse_stocks.duckdb).
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the schema and seed the tracked-stock roster.
    Init,
    /// Download daily history for every tracked stock.
    Fetch(FetchArgs),
    /// Aggregate stored history and write candlestick chart files.
    Charts(ChartsArgs),
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// First day of history to request, YYYY-MM-DD (defaults to 2010-01-01).
    #[arg(long)]
    pub start: Option<String>,
}

#[derive(Debug, Args)]
pub struct ChartsArgs {
    /// Directory the chart tree is written under.
    #[arg(long, default_value = "charts")]
    pub output_dir: PathBuf,
}
