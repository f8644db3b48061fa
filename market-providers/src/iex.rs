//! IEX Cloud TOPS: intraday top-of-book bid and ask.

use async_trait::async_trait;
use quote_engine::domain::BidAsk;
use quote_engine::ports::IntradayQuoteProvider;
use reqwest::Client;
use serde::Deserialize;
use shared::{Error, Result};
use std::time::Duration;
use tracing::debug;

use crate::http::{build_client, get_text};

const BASE_URL: &str = "https://cloud.iexapis.com";
const PROVIDER_NAME: &str = "IEX TOPS";

pub struct IexCloudClient {
    client: Client,
    token: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Tops {
    symbol: Option<String>,
    bid_price: Option<f64>,
    ask_price: Option<f64>,
}

impl IexCloudClient {
    pub fn new(token: String, timeout: Duration) -> Self {
        Self::with_base_url(token, timeout, BASE_URL)
    }

    pub fn with_base_url(token: String, timeout: Duration, base_url: impl Into<String>) -> Self {
        Self {
            client: build_client(timeout),
            token,
            base_url: base_url.into(),
        }
    }
}

/// First TOPS entry's bid/ask; an empty list means no data for the symbol
fn parse_tops(body: &str) -> Result<Option<BidAsk>> {
    let tops: Vec<Tops> = serde_json::from_str(body)
        .map_err(|e| Error::provider(PROVIDER_NAME, format!("invalid JSON: {}", e)))?;

    Ok(tops.into_iter().next().map(|t| {
        debug!("{} entry for {:?}", PROVIDER_NAME, t.symbol);
        BidAsk::new(t.bid_price.unwrap_or(0.0), t.ask_price.unwrap_or(0.0))
    }))
}

#[async_trait]
impl IntradayQuoteProvider for IexCloudClient {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn bid_ask(&self, symbol: &str) -> Result<Option<BidAsk>> {
        let url = format!("{}/stable/tops", self.base_url);
        let body = get_text(
            &self.client,
            PROVIDER_NAME,
            &url,
            &[("token", self.token.as_str()), ("symbols", symbol)],
            &self.token,
        )
        .await?;
        parse_tops(&body)
    }
}
