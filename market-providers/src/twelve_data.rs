//! Twelve Data: real-time trade price, detailed quote and index time series.

use async_trait::async_trait;
use chrono::Utc;
use quote_engine::domain::{DetailedQuote, IndicesSnapshot};
use quote_engine::ports::{TimeSeriesProvider, TradePriceProvider};
use reqwest::Client;
use serde::Deserialize;
use shared::{Error, Result};
use std::time::Duration;

use crate::http::{build_client, get_text, parse_number};

const BASE_URL: &str = "https://api.twelvedata.com";
const PRICE_NAME: &str = "Twelve Data Real Time Price";
const TIME_SERIES_NAME: &str = "Twelve Data Time Series";

/// Symbols requested for the indices snapshot
const INDEX_SYMBOLS: &str = "SPX,IXIC,DJI";

pub struct TwelveDataClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// Error envelope shared by every endpoint
#[derive(Debug, Deserialize)]
struct ApiStatus {
    status: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    name: Option<String>,
    open: Option<String>,
    high: Option<String>,
    low: Option<String>,
    close: Option<String>,
    volume: Option<String>,
    previous_close: Option<String>,
    change: Option<String>,
    percent_change: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IndicesResponse {
    #[serde(rename = "DJI")]
    dow: Series,
    #[serde(rename = "SPX")]
    sp500: Series,
    #[serde(rename = "IXIC")]
    nasdaq: Series,
}

#[derive(Debug, Deserialize)]
struct Series {
    #[serde(default)]
    values: Vec<Bar>,
    status: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Bar {
    close: Option<String>,
}

impl TwelveDataClient {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self::with_base_url(api_key, timeout, BASE_URL)
    }

    pub fn with_base_url(api_key: String, timeout: Duration, base_url: impl Into<String>) -> Self {
        Self {
            client: build_client(timeout),
            api_key,
            base_url: base_url.into(),
        }
    }

    async fn fetch(&self, provider: &str, path: &str, params: &[(&str, &str)]) -> Result<String> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("apikey", &self.api_key));
        let url = format!("{}{}", self.base_url, path);
        get_text(&self.client, provider, &url, &all_params, &self.api_key).await
    }
}

fn check_status(provider: &str, body: &str) -> Result<()> {
    let status: ApiStatus = serde_json::from_str(body)
        .map_err(|e| Error::provider(provider, format!("invalid JSON: {}", e)))?;
    if status.status.as_deref() == Some("error") {
        return Err(Error::provider(
            provider,
            status.message.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }
    Ok(())
}

fn parse_price(body: &str) -> Result<f64> {
    check_status(PRICE_NAME, body)?;
    let response: PriceResponse = serde_json::from_str(body)
        .map_err(|e| Error::provider(PRICE_NAME, format!("invalid JSON: {}", e)))?;
    parse_number(PRICE_NAME, "price", response.price.as_deref())
}

fn parse_quote(symbol: &str, body: &str) -> Result<DetailedQuote> {
    check_status(TIME_SERIES_NAME, body)?;
    let q: QuoteResponse = serde_json::from_str(body)
        .map_err(|e| Error::provider(TIME_SERIES_NAME, format!("invalid JSON: {}", e)))?;
    let field = |name: &str, raw: &Option<String>| parse_number(TIME_SERIES_NAME, name, raw.as_deref());

    Ok(DetailedQuote {
        symbol: symbol.to_string(),
        name: q.name.clone().unwrap_or_default(),
        timestamp: Utc::now(),
        open: field("open", &q.open)?,
        high: field("high", &q.high)?,
        low: field("low", &q.low)?,
        close: field("close", &q.close)?,
        // indices report no volume
        volume: match q.volume.as_deref() {
            Some(_) => field("volume", &q.volume)?,
            None => 0.0,
        },
        previous_close: field("previous_close", &q.previous_close)?,
        change: field("change", &q.change)?,
        change_percent: field("percent_change", &q.percent_change)?,
    })
}

fn latest_close(label: &str, series: &Series) -> Result<f64> {
    if series.status.as_deref() == Some("error") {
        return Err(Error::provider(
            TIME_SERIES_NAME,
            format!(
                "{}: {}",
                label,
                series.message.as_deref().unwrap_or("unknown error")
            ),
        ));
    }
    let bar = series
        .values
        .first()
        .ok_or_else(|| Error::provider(TIME_SERIES_NAME, format!("{}: no values", label)))?;
    parse_number(TIME_SERIES_NAME, label, bar.close.as_deref())
}

fn parse_indices(body: &str) -> Result<IndicesSnapshot> {
    check_status(TIME_SERIES_NAME, body)?;
    let response: IndicesResponse = serde_json::from_str(body)
        .map_err(|e| Error::provider(TIME_SERIES_NAME, format!("invalid JSON: {}", e)))?;

    Ok(IndicesSnapshot {
        dow: latest_close("DJI", &response.dow)?,
        sp500: latest_close("SPX", &response.sp500)?,
        nasdaq: latest_close("IXIC", &response.nasdaq)?,
    })
}

#[async_trait]
impl TradePriceProvider for TwelveDataClient {
    fn name(&self) -> &'static str {
        PRICE_NAME
    }

    async fn trade_price(&self, symbol: &str) -> Result<f64> {
        let body = self.fetch(PRICE_NAME, "/price", &[("symbol", symbol)]).await?;
        parse_price(&body)
    }
}

#[async_trait]
impl TimeSeriesProvider for TwelveDataClient {
    fn name(&self) -> &'static str {
        TIME_SERIES_NAME
    }

    async fn detailed_quote(&self, symbol: &str, interval: &str) -> Result<DetailedQuote> {
        let body = self
            .fetch(
                TIME_SERIES_NAME,
                "/quote",
                &[("symbol", symbol), ("interval", interval)],
            )
            .await?;
        parse_quote(symbol, &body)
    }

    async fn indices(&self) -> Result<IndicesSnapshot> {
        let body = self
            .fetch(
                TIME_SERIES_NAME,
                "/time_series",
                &[("symbol", INDEX_SYMBOLS), ("interval", "1min")],
            )
            .await?;
        parse_indices(&body)
    }
}
