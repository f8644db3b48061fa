mod cache_control;
mod operation;

pub use cache_control::{CacheControlRegistry, parse_symbols_csv};
pub use operation::CacheControlOperations;
