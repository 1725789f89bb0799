mod charts;
mod fetch;
mod init;

use std::path::PathBuf;

use stockbook_warehouse::WarehouseConfig;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let config = warehouse_config(cli.db_path.clone());

    match &cli.command {
        Command::Init => init::run(config),
        Command::Fetch(args) => fetch::run(args, config).await,
        Command::Charts(args) => charts::run(args, config),
    }
}

fn warehouse_config(db_path: Option<PathBuf>) -> WarehouseConfig {
    match db_path {
        Some(path) => WarehouseConfig::at_db_path(path),
        None => WarehouseConfig::default(),
    }
}
