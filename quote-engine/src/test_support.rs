// In-memory doubles for the store and provider ports

use crate::domain::{BidAsk, CacheKey, DetailedQuote, IndicesSnapshot, Record};
use crate::ports::{
    CacheStore, GlobalQuoteProvider, IntradayQuoteProvider, TimeSeriesProvider,
    TradePriceProvider,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use shared::{Error, Result, TtlSecs};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

struct Entry {
    record: Record,
    expires_at: Option<Duration>,
}

/// Store with a manual clock; `advance` moves time forward
#[derive(Default)]
pub struct MemoryStore {
    now: Mutex<Duration>,
    records: Mutex<HashMap<CacheKey, Entry>>,
    lists: Mutex<HashMap<(CacheKey, String), Vec<String>>>,
    last_ttl: Mutex<Option<TtlSecs>>,
    gets: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }

    /// Live (unexpired) record count
    pub fn len(&self) -> usize {
        let now = *self.now.lock().unwrap();
        self.records
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.expires_at.is_none_or(|at| now < at))
            .count()
    }

    pub fn last_ttl(&self) -> Option<TtlSecs> {
        *self.last_ttl.lock().unwrap()
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &CacheKey) -> Result<Record> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        let now = *self.now.lock().unwrap();
        let records = self.records.lock().unwrap();
        match records.get(key) {
            Some(entry) if entry.expires_at.is_none_or(|at| now < at) => Ok(entry.record.clone()),
            _ => Err(Error::NotFound),
        }
    }

    async fn put(&self, key: CacheKey, record: Record, ttl: Option<TtlSecs>) -> Result<()> {
        let now = *self.now.lock().unwrap();
        *self.last_ttl.lock().unwrap() = ttl;
        let expires_at = ttl.map(|t| now + t.as_duration());
        self.records
            .lock()
            .unwrap()
            .insert(key, Entry { record, expires_at });
        Ok(())
    }

    async fn list_read(&self, key: &CacheKey, bin: &str) -> Result<Vec<String>> {
        let lists = self.lists.lock().unwrap();
        Ok(lists
            .get(&(key.clone(), bin.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_append(&self, key: &CacheKey, bin: &str, items: Vec<String>) -> Result<usize> {
        let mut lists = self.lists.lock().unwrap();
        let list = lists.entry((key.clone(), bin.to_string())).or_default();
        list.extend(items);
        Ok(list.len())
    }

    async fn list_clear(&self, key: &CacheKey, bin: &str) -> Result<()> {
        self.lists
            .lock()
            .unwrap()
            .insert((key.clone(), bin.to_string()), Vec::new());
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }
}

/// Store whose every call fails with a connectivity error
pub struct UnavailableStore;

fn down<T>() -> Result<T> {
    Err(Error::StoreUnavailable("connection refused".to_string()))
}

#[async_trait]
impl CacheStore for UnavailableStore {
    async fn get(&self, _key: &CacheKey) -> Result<Record> {
        down()
    }

    async fn put(&self, _key: CacheKey, _record: Record, _ttl: Option<TtlSecs>) -> Result<()> {
        down()
    }

    async fn list_read(&self, _key: &CacheKey, _bin: &str) -> Result<Vec<String>> {
        down()
    }

    async fn list_append(&self, _key: &CacheKey, _bin: &str, _items: Vec<String>) -> Result<usize> {
        down()
    }

    async fn list_clear(&self, _key: &CacheKey, _bin: &str) -> Result<()> {
        down()
    }

    fn is_connected(&self) -> bool {
        false
    }
}

/// Scripted provider behaviour
#[derive(Clone, Copy, Debug)]
pub enum Reply<T> {
    Value(T),
    Fail,
    Hang,
}

async fn respond<T>(name: &str, reply: Reply<T>) -> Result<T> {
    match reply {
        Reply::Value(v) => Ok(v),
        Reply::Fail => Err(Error::provider(name, "HTTP 500")),
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(Error::provider(name, "unreachable"))
        }
    }
}

pub struct FakeTrade {
    reply: Reply<f64>,
    pub calls: AtomicUsize,
}

impl FakeTrade {
    pub const NAME: &'static str = "Fake Trade";

    pub fn new(reply: Reply<f64>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TradePriceProvider for FakeTrade {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn trade_price(&self, _symbol: &str) -> Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        respond(Self::NAME, self.reply).await
    }
}

pub struct FakeIntraday {
    reply: Reply<Option<BidAsk>>,
    pub calls: AtomicUsize,
}

impl FakeIntraday {
    pub const NAME: &'static str = "Fake Intraday";

    pub fn new(reply: Reply<Option<BidAsk>>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IntradayQuoteProvider for FakeIntraday {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn bid_ask(&self, _symbol: &str) -> Result<Option<BidAsk>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        respond(Self::NAME, self.reply).await
    }
}

pub struct FakeGlobal {
    reply: Reply<f64>,
    pub calls: AtomicUsize,
}

impl FakeGlobal {
    pub const NAME: &'static str = "Fake Global";

    pub fn new(reply: Reply<f64>) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GlobalQuoteProvider for FakeGlobal {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn quote_price(&self, _symbol: &str) -> Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        respond(Self::NAME, self.reply).await
    }
}

pub struct FakeTimeSeries {
    quote: Reply<()>,
    indices: Reply<IndicesSnapshot>,
    pub calls: AtomicUsize,
    pub last_interval: Mutex<Option<String>>,
}

impl FakeTimeSeries {
    pub const NAME: &'static str = "Fake Time Series";

    pub fn new(quote: Reply<()>, indices: Reply<IndicesSnapshot>) -> Self {
        Self {
            quote,
            indices,
            calls: AtomicUsize::new(0),
            last_interval: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TimeSeriesProvider for FakeTimeSeries {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn detailed_quote(&self, symbol: &str, interval: &str) -> Result<DetailedQuote> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_interval.lock().unwrap() = Some(interval.to_string());
        respond(Self::NAME, self.quote).await?;
        Ok(sample_quote(symbol))
    }

    async fn indices(&self) -> Result<IndicesSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        respond(Self::NAME, self.indices).await
    }
}

pub fn sample_quote(symbol: &str) -> DetailedQuote {
    DetailedQuote {
        symbol: symbol.to_string(),
        name: format!("{} Corp", symbol),
        timestamp: Utc.with_ymd_and_hms(2024, 3, 15, 20, 0, 0).unwrap(),
        open: 410.0,
        high: 415.25,
        low: 408.5,
        close: 414.0,
        volume: 21_000_000.0,
        previous_close: 409.0,
        change: 5.0,
        change_percent: 1.2225,
    }
}

pub fn sample_indices() -> IndicesSnapshot {
    IndicesSnapshot {
        dow: 38_714.77,
        sp500: 5_117.09,
        nasdaq: 15_973.17,
    }
}
