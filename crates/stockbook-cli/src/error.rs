use std::path::PathBuf;

use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] stockbook_core::ValidationError),

    #[error("database file not found at {path}; run `stockbook init` first")]
    MissingDatabase { path: PathBuf },

    #[error(transparent)]
    Warehouse(stockbook_warehouse::WarehouseError),

    #[error(transparent)]
    Chart(#[from] stockbook_charts::ChartError),

    #[error("provider error: {0}")]
    Source(#[from] stockbook_core::SourceError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::MissingDatabase { .. } => 4,
            Self::Warehouse(_) | Self::Chart(_) | Self::Source(_) | Self::Io(_) => 10,
        }
    }
}

impl From<stockbook_warehouse::WarehouseError> for CliError {
    fn from(error: stockbook_warehouse::WarehouseError) -> Self {
        match error {
            stockbook_warehouse::WarehouseError::MissingDatabase { path } => {
                Self::MissingDatabase { path }
            }
            other => Self::Warehouse(other),
        }
    }
}
