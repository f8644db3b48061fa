mod market_data_service;
mod operation;

pub use market_data_service::{DEFAULT_INTERVAL, MarketDataService};
pub use operation::MarketDataOperations;
