use stockbook_core::default_roster;
use stockbook_warehouse::{StockSeed, Warehouse, WarehouseConfig};

use crate::error::CliError;

pub fn run(config: WarehouseConfig) -> Result<(), CliError> {
    let warehouse = Warehouse::create(config)?;
    println!("database ready at {}", warehouse.db_path().display());

    let seeds: Vec<StockSeed> = default_roster()
        .into_iter()
        .map(|listing| StockSeed {
            ticker: listing.ticker.to_string(),
            name: listing.name,
        })
        .collect();

    let inserted = warehouse.seed_roster(&seeds)?;
    println!(
        "roster: {} tracked stocks, {} newly inserted",
        seeds.len(),
        inserted
    );
    Ok(())
}
