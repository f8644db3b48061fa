use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Fixed names under which every cached record is organised
pub mod names {
    pub const NAMESPACE: &str = "mds";

    pub const SET_LATEST_PRICE: &str = "latest_price";
    pub const SET_AGGREGATE_PRICE: &str = "aggregate_price";
    pub const SET_DETAILED_QUOTE: &str = "detailed_quote";
    pub const SET_INDICES: &str = "indices";
    pub const SET_CACHE_CONTROL: &str = "cache_control";

    pub const BIN_PRICE: &str = "price";
    pub const BIN_QUOTE: &str = "quote";
    pub const BIN_DOW: &str = "dow";
    pub const BIN_SP500: &str = "sp500";
    pub const BIN_NASDAQ: &str = "nasdaq";
    pub const BIN_GLOBAL_DISABLED: &str = "global_disabled";
    pub const BIN_DISABLED_SYMBOLS: &str = "disabled_symbols";

    pub const INDICES_RECORD_KEY: &str = "idxCache";
    pub const CACHE_CONTROL_RECORD_KEY: &str = "cacheControl";

    /// Pseudo-symbol consulted in the bypass list for indices requests
    pub const INDICES_PSEUDO_SYMBOL: &str = "INDICES";
}

pub const DOW_NAME: &str = "DOW";
pub const SP500_NAME: &str = "S&P 500";
pub const NASDAQ_NAME: &str = "NASDAQ Composite";

/// Three-part address of a record: namespace, set and record key
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub namespace: String,
    pub set: String,
    pub key: String,
}

impl CacheKey {
    pub fn new(set: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: names::NAMESPACE.to_string(),
            set: set.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.set, self.key)
    }
}

/// Typed value of a single bin
#[derive(Clone, Debug, PartialEq)]
pub enum BinValue {
    Float(f64),
    Bool(bool),
    Blob(Bytes),
}

/// A cache record: named bins, each holding one typed value
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    bins: HashMap<String, BinValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bin(mut self, name: impl Into<String>, value: BinValue) -> Self {
        self.bins.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&BinValue> {
        self.bins.get(name)
    }

    /// Float bin value; a bin of another type reads as absent
    pub fn float(&self, name: &str) -> Option<f64> {
        match self.bins.get(name) {
            Some(BinValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.bins.get(name) {
            Some(BinValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn blob(&self, name: &str) -> Option<Bytes> {
        match self.bins.get(name) {
            Some(BinValue::Blob(v)) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

/// Scalar price categories, one record set each
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PriceCategory {
    Latest,
    Aggregate,
}

impl PriceCategory {
    pub fn set_name(&self) -> &'static str {
        match self {
            PriceCategory::Latest => names::SET_LATEST_PRICE,
            PriceCategory::Aggregate => names::SET_AGGREGATE_PRICE,
        }
    }
}

/// Detailed quote as cached and returned to clients
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DetailedQuote {
    pub symbol: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
}

impl DetailedQuote {
    /// Blank symbol marks the "no cached value" sentinel
    pub fn is_empty(&self) -> bool {
        self.symbol.trim().is_empty()
    }
}

/// Points for the three tracked indices
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicesSnapshot {
    pub dow: f64,
    pub sp500: f64,
    pub nasdaq: f64,
}

impl IndicesSnapshot {
    pub fn to_indices(&self) -> Vec<StockIndex> {
        vec![
            StockIndex::new(DOW_NAME, self.dow),
            StockIndex::new(SP500_NAME, self.sp500),
            StockIndex::new(NASDAQ_NAME, self.nasdaq),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StockIndex {
    pub name: String,
    pub points: f64,
}

impl StockIndex {
    pub fn new(name: impl Into<String>, points: f64) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}

/// Bid/ask pair reported by an intraday quote provider
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BidAsk {
    pub bid: f64,
    pub ask: f64,
}

impl BidAsk {
    pub fn new(bid: f64, ask: f64) -> Self {
        Self { bid, ask }
    }

    /// Mid-price, only when both sides are strictly positive
    pub fn mid(&self) -> Option<f64> {
        if self.bid > 0.0 && self.ask > 0.0 {
            Some((self.bid + self.ask) / 2.0)
        } else {
            None
        }
    }
}

/// Live price produced per request by the aggregator; only `price` is cached
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedPrice {
    pub symbol: String,
    pub price: f64,
    pub source: Source,
    pub timestamp: DateTime<Utc>,
}

/// Provenance of a response
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    CachedLatestPrice,
    CachedAggregatePrice,
    CachedDetailedQuote,
    CachedIndices,
    /// Served live by a single named provider
    Live(String),
    /// Blended live from the listed providers
    Aggregate(Vec<String>),
}

impl Source {
    pub fn cached_price(category: PriceCategory) -> Self {
        match category {
            PriceCategory::Latest => Source::CachedLatestPrice,
            PriceCategory::Aggregate => Source::CachedAggregatePrice,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(
            self,
            Source::CachedLatestPrice
                | Source::CachedAggregatePrice
                | Source::CachedDetailedQuote
                | Source::CachedIndices
        )
    }

    pub fn label(&self) -> String {
        match self {
            Source::CachedLatestPrice => "Cached Latest Price".to_string(),
            Source::CachedAggregatePrice => "Cached Aggregate Price".to_string(),
            Source::CachedDetailedQuote => "Cached Detailed Quote".to_string(),
            Source::CachedIndices => "Cached Indices".to_string(),
            Source::Live(provider) => provider.clone(),
            Source::Aggregate(providers) => {
                format!("Aggregate Real Time Price ({})", providers.join(", "))
            }
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

pub mod response {
    use super::{DetailedQuote, Source, StockIndex};
    use chrono::{DateTime, Utc};

    #[derive(Clone, Debug)]
    pub struct PriceResponse {
        pub symbol: String,
        pub price: f64,
        pub timestamp: DateTime<Utc>,
        pub source: Source,
    }

    impl PriceResponse {
        pub fn new(symbol: impl Into<String>, price: f64, source: Source) -> Self {
            Self {
                symbol: symbol.into(),
                price,
                timestamp: Utc::now(),
                source,
            }
        }
    }

    #[derive(Clone, Debug)]
    pub struct DetailedQuoteResponse {
        pub quote: DetailedQuote,
        pub source: Source,
    }

    impl DetailedQuoteResponse {
        pub fn new(quote: DetailedQuote, source: Source) -> Self {
            Self { quote, source }
        }
    }

    #[derive(Clone, Debug)]
    pub struct IndicesResponse {
        pub indices: Vec<StockIndex>,
        pub source: Source,
        pub timestamp: DateTime<Utc>,
    }

    impl IndicesResponse {
        pub fn new(indices: Vec<StockIndex>, source: Source) -> Self {
            Self {
                indices,
                source,
                timestamp: Utc::now(),
            }
        }
    }
}
