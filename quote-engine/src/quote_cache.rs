use crate::codec;
use crate::domain::{
    BinValue, CacheKey, DetailedQuote, IndicesSnapshot, PriceCategory, Record, names,
};
use crate::ports::CacheStore;
use shared::{Error, TtlSecs};
use std::sync::Arc;
use tracing::{debug, warn};

/// Typed cache facade over the store port
///
/// Reads never fail: store outages, malformed records and absent bins all read
/// as a miss. Writes never fail the caller: errors are logged and dropped.
#[derive(Clone)]
pub struct QuoteCache {
    store: Arc<dyn CacheStore>,
    ttl: TtlSecs,
}

impl QuoteCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: TtlSecs) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> TtlSecs {
        self.ttl
    }

    pub fn is_connected(&self) -> bool {
        self.store.is_connected()
    }

    /// Cached scalar price; any value <= 0 is a miss
    pub async fn get_price(&self, symbol: &str, category: PriceCategory) -> Option<f64> {
        let key = CacheKey::new(category.set_name(), symbol);
        let record = self.read(&key).await?;
        match record.float(names::BIN_PRICE) {
            Some(price) if price > 0.0 && price.is_finite() => Some(price),
            Some(price) => {
                debug!("Ignoring non-positive cached price {} for {}", price, key);
                None
            }
            None => None,
        }
    }

    pub async fn put_price(&self, symbol: &str, category: PriceCategory, price: f64) {
        if !price.is_finite() {
            warn!("Refusing to cache non-finite price for {} ({:?})", symbol, category);
            return;
        }
        let key = CacheKey::new(category.set_name(), symbol);
        let record = Record::new().with_bin(names::BIN_PRICE, BinValue::Float(price));
        self.write(key, record).await;
    }

    /// Cached detailed quote; a malformed blob decodes to the empty quote and reads as a miss
    pub async fn get_detailed_quote(&self, symbol: &str) -> Option<DetailedQuote> {
        let key = CacheKey::new(names::SET_DETAILED_QUOTE, symbol);
        let blob = self.read(&key).await?.blob(names::BIN_QUOTE)?;
        let quote = codec::decode(blob);
        if quote.is_empty() { None } else { Some(quote) }
    }

    pub async fn put_detailed_quote(&self, quote: &DetailedQuote) {
        if quote.is_empty() {
            warn!("Refusing to cache detailed quote with blank symbol");
            return;
        }
        let key = CacheKey::new(names::SET_DETAILED_QUOTE, quote.symbol.as_str());
        let record = Record::new().with_bin(names::BIN_QUOTE, BinValue::Blob(codec::encode(quote)));
        self.write(key, record).await;
    }

    /// Cached indices; all three points must be present
    pub async fn get_indices(&self) -> Option<IndicesSnapshot> {
        let key = CacheKey::new(names::SET_INDICES, names::INDICES_RECORD_KEY);
        let record = self.read(&key).await?;
        Some(IndicesSnapshot {
            dow: record.float(names::BIN_DOW)?,
            sp500: record.float(names::BIN_SP500)?,
            nasdaq: record.float(names::BIN_NASDAQ)?,
        })
    }

    pub async fn put_indices(&self, snapshot: &IndicesSnapshot) {
        if ![snapshot.dow, snapshot.sp500, snapshot.nasdaq]
            .iter()
            .all(|p| p.is_finite())
        {
            warn!("Refusing to cache indices with non-finite points: {:?}", snapshot);
            return;
        }
        let key = CacheKey::new(names::SET_INDICES, names::INDICES_RECORD_KEY);
        let record = Record::new()
            .with_bin(names::BIN_DOW, BinValue::Float(snapshot.dow))
            .with_bin(names::BIN_SP500, BinValue::Float(snapshot.sp500))
            .with_bin(names::BIN_NASDAQ, BinValue::Float(snapshot.nasdaq));
        self.write(key, record).await;
    }

    async fn read(&self, key: &CacheKey) -> Option<Record> {
        match self.store.get(key).await {
            Ok(record) => Some(record),
            Err(Error::NotFound) => None,
            Err(e) => {
                warn!("Cache read for {} failed, treating as miss: {}", key, e);
                None
            }
        }
    }

    async fn write(&self, key: CacheKey, record: Record) {
        let label = key.to_string();
        if let Err(e) = self.store.put(key, record, Some(self.ttl)).await {
            warn!("Cache write for {} dropped: {}", label, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryStore, UnavailableStore, sample_quote};
    use bytes::Bytes;
    use std::time::Duration;

    fn cache_with(store: Arc<MemoryStore>) -> QuoteCache {
        QuoteCache::new(store, TtlSecs(30))
    }

    #[tokio::test]
    async fn test_price_round_trip_per_category() {
        let store = Arc::new(MemoryStore::new());
        let cache = cache_with(store.clone());

        cache.put_price("AAPL", PriceCategory::Latest, 101.5).await;
        assert_eq!(cache.get_price("AAPL", PriceCategory::Latest).await, Some(101.5));
        assert_eq!(cache.get_price("AAPL", PriceCategory::Aggregate).await, None);
        assert_eq!(store.last_ttl(), Some(TtlSecs(30)));
    }

    #[tokio::test]
    async fn test_non_positive_price_reads_as_miss() {
        let store = Arc::new(MemoryStore::new());
        let cache = cache_with(store.clone());

        cache.put_price("ZERO", PriceCategory::Latest, 0.0).await;
        cache.put_price("NEG", PriceCategory::Latest, -3.0).await;

        assert_eq!(cache.get_price("ZERO", PriceCategory::Latest).await, None);
        assert_eq!(cache.get_price("NEG", PriceCategory::Latest).await, None);
    }

    #[tokio::test]
    async fn test_non_finite_price_is_not_written() {
        let store = Arc::new(MemoryStore::new());
        let cache = cache_with(store.clone());

        cache.put_price("NAN", PriceCategory::Latest, f64::NAN).await;
        cache.put_price("INF", PriceCategory::Latest, f64::INFINITY).await;
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_record_without_price_bin_is_miss() {
        let store = Arc::new(MemoryStore::new());
        store
            .put(
                CacheKey::new(names::SET_LATEST_PRICE, "AAPL"),
                Record::new().with_bin("other", BinValue::Float(5.0)),
                None,
            )
            .await
            .unwrap();
        let cache = cache_with(store);
        assert_eq!(cache.get_price("AAPL", PriceCategory::Latest).await, None);
    }

    #[tokio::test]
    async fn test_expired_price_reads_as_never_written() {
        let store = Arc::new(MemoryStore::new());
        let cache = cache_with(store.clone());

        cache.put_price("AAPL", PriceCategory::Latest, 99.0).await;
        store.advance(Duration::from_secs(29));
        assert_eq!(cache.get_price("AAPL", PriceCategory::Latest).await, Some(99.0));

        store.advance(Duration::from_secs(1));
        assert_eq!(cache.get_price("AAPL", PriceCategory::Latest).await, None);
    }

    #[tokio::test]
    async fn test_detailed_quote_round_trip() {
        let cache = cache_with(Arc::new(MemoryStore::new()));
        let quote = sample_quote("MSFT");

        cache.put_detailed_quote(&quote).await;
        assert_eq!(cache.get_detailed_quote("MSFT").await, Some(quote));
    }

    #[tokio::test]
    async fn test_malformed_detailed_quote_is_miss() {
        let store = Arc::new(MemoryStore::new());
        store
            .put(
                CacheKey::new(names::SET_DETAILED_QUOTE, "MSFT"),
                Record::new().with_bin(names::BIN_QUOTE, BinValue::Blob(Bytes::from_static(b"bad"))),
                None,
            )
            .await
            .unwrap();
        let cache = cache_with(store);
        assert_eq!(cache.get_detailed_quote("MSFT").await, None);
    }

    #[tokio::test]
    async fn test_blank_symbol_quote_is_not_written() {
        let store = Arc::new(MemoryStore::new());
        let cache = cache_with(store.clone());
        cache.put_detailed_quote(&DetailedQuote::default()).await;
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_indices_require_all_three_points() {
        let store = Arc::new(MemoryStore::new());
        let cache = cache_with(store.clone());

        store
            .put(
                CacheKey::new(names::SET_INDICES, names::INDICES_RECORD_KEY),
                Record::new()
                    .with_bin(names::BIN_DOW, BinValue::Float(39_000.0))
                    .with_bin(names::BIN_SP500, BinValue::Float(5_100.0)),
                None,
            )
            .await
            .unwrap();
        assert_eq!(cache.get_indices().await, None);

        let snapshot = IndicesSnapshot {
            dow: 39_000.0,
            sp500: 5_100.0,
            nasdaq: 16_000.0,
        };
        cache.put_indices(&snapshot).await;
        assert_eq!(cache.get_indices().await, Some(snapshot));
    }

    #[tokio::test]
    async fn test_unavailable_store_degrades_to_miss() {
        let cache = QuoteCache::new(Arc::new(UnavailableStore), TtlSecs(30));

        cache.put_price("AAPL", PriceCategory::Latest, 100.0).await;
        cache.put_detailed_quote(&sample_quote("AAPL")).await;
        assert_eq!(cache.get_price("AAPL", PriceCategory::Latest).await, None);
        assert_eq!(cache.get_detailed_quote("AAPL").await, None);
        assert_eq!(cache.get_indices().await, None);
        assert!(!cache.is_connected());
    }
}
