#![deny(clippy::all)]

use crate::domain::{BidAsk, CacheKey, DetailedQuote, IndicesSnapshot, Record};
use async_trait::async_trait;
use shared::{Result, TtlSecs};

// Ports are the pluggable extension points for the backing store and the upstream providers

/// Port for the shared key/value store holding cached quotes and control state
///
/// A miss (absent or expired record) is `Err(Error::NotFound)`; a connectivity
/// failure is `Err(Error::StoreUnavailable)`.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    async fn get(&self, key: &CacheKey) -> Result<Record>;

    /// Replace the record under `key`. `None` TTL means the record never expires.
    async fn put(&self, key: CacheKey, record: Record, ttl: Option<TtlSecs>) -> Result<()>;

    /// Read a list bin; a missing list reads as empty
    async fn list_read(&self, key: &CacheKey, bin: &str) -> Result<Vec<String>>;

    /// Append items to a list bin in one atomic step, returning the new length
    async fn list_append(&self, key: &CacheKey, bin: &str, items: Vec<String>) -> Result<usize>;

    /// Reset a list bin to an empty, writable list in one atomic step
    async fn list_clear(&self, key: &CacheKey, bin: &str) -> Result<()>;

    /// Only for health reporting, never for request-path decisions
    fn is_connected(&self) -> bool;
}

/// Real-time last trade price
#[async_trait]
pub trait TradePriceProvider: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    async fn trade_price(&self, symbol: &str) -> Result<f64>;
}

/// Intraday top-of-book; `Ok(None)` when the provider has no data for the symbol
#[async_trait]
pub trait IntradayQuoteProvider: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    async fn bid_ask(&self, symbol: &str) -> Result<Option<BidAsk>>;
}

/// End-of-day / global quote price
#[async_trait]
pub trait GlobalQuoteProvider: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    async fn quote_price(&self, symbol: &str) -> Result<f64>;
}

/// Time-series provider backing detailed quotes and indices
#[async_trait]
pub trait TimeSeriesProvider: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    async fn detailed_quote(&self, symbol: &str, interval: &str) -> Result<DetailedQuote>;

    async fn indices(&self) -> Result<IndicesSnapshot>;
}
