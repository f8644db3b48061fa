pub mod about;
pub mod cache_control;
pub mod health;
pub mod market_data;

pub use about::about;
pub use cache_control::{
    append_to_symbols_list, clear_symbols_list, get_global_cache_status, get_symbols_list,
    set_global_cache_status,
};
pub use health::health_check;
pub use market_data::{
    aggregate_price, detailed_quote, detailed_quote_with_interval, indices, latest_price,
};
