use chrono::{DateTime, Utc};
use quote_engine::domain::StockIndex;
use quote_engine::domain::response::{DetailedQuoteResponse, IndicesResponse, PriceResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub cache: String,
}

#[derive(Debug, Serialize)]
pub struct PriceBody {
    pub symbol: String,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

impl From<PriceResponse> for PriceBody {
    fn from(r: PriceResponse) -> Self {
        Self {
            symbol: r.symbol,
            price: r.price,
            timestamp: r.timestamp,
            source: r.source.label(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedQuoteBody {
    pub symbol: String,
    pub name: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

impl From<DetailedQuoteResponse> for DetailedQuoteBody {
    fn from(r: DetailedQuoteResponse) -> Self {
        let q = r.quote;
        Self {
            symbol: q.symbol,
            name: q.name,
            open: q.open,
            high: q.high,
            low: q.low,
            close: q.close,
            volume: q.volume,
            previous_close: q.previous_close,
            change: q.change,
            change_percent: q.change_percent,
            timestamp: q.timestamp,
            source: r.source.label(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IndicesBody {
    pub indices: Vec<StockIndex>,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

impl From<IndicesResponse> for IndicesBody {
    fn from(r: IndicesResponse) -> Self {
        Self {
            indices: r.indices,
            source: r.source.label(),
            timestamp: r.timestamp,
        }
    }
}

// === Cache Control Models ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalCacheStatusResponse {
    pub is_global_cache_disabled: bool,
}

#[derive(Debug, Serialize)]
pub struct SymbolsListResponse {
    pub symbols: Vec<String>,
}

// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
