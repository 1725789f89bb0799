pub mod date;
pub mod models;
pub mod ticker;

pub use date::parse_iso_date;
pub use models::{AggregatedBar, DailyBar, StockListing};
pub use ticker::Ticker;
