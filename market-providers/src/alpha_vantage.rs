//! Alpha Vantage GLOBAL_QUOTE: end-of-day / global quote price.
//!
//! Note: the free tier is limited to 5 API calls per minute.

use async_trait::async_trait;
use quote_engine::ports::GlobalQuoteProvider;
use reqwest::Client;
use serde::Deserialize;
use shared::{Error, Result};
use std::time::Duration;
use tracing::warn;

use crate::http::{build_client, get_text, parse_number};

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER_NAME: &str = "Alpha Vantage Global Quote";

pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GlobalQuote {
    #[serde(rename = "05. price")]
    price: Option<String>,
}

impl AlphaVantageClient {
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
}

fn check_api_error(response: &GlobalQuoteResponse) -> Result<()> {
    if let Some(ref msg) = response.error_message {
        return Err(Error::provider(PROVIDER_NAME, msg.clone()));
    }

    // "Note" and "Information" usually mean the call quota is exhausted
    for msg in [&response.note, &response.information].into_iter().flatten() {
        if msg.contains("API call frequency") || msg.contains("rate limit") {
            return Err(Error::provider(PROVIDER_NAME, "rate limited"));
        }
        warn!("Alpha Vantage note: {}", msg);
    }

    Ok(())
}

fn parse_global_quote(body: &str) -> Result<f64> {
    let response: GlobalQuoteResponse = serde_json::from_str(body)
        .map_err(|e| Error::provider(PROVIDER_NAME, format!("invalid JSON: {}", e)))?;
    check_api_error(&response)?;

    let price = response.global_quote.and_then(|q| q.price);
    parse_number(PROVIDER_NAME, "05. price", price.as_deref())
}

#[async_trait]
impl GlobalQuoteProvider for AlphaVantageClient {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn quote_price(&self, symbol: &str) -> Result<f64> {
        let body = get_text(
            &self.client,
            PROVIDER_NAME,
            &self.base_url,
            &[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ],
            &self.api_key,
        )
        .await?;
        parse_global_quote(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_quote() {
        let body = r#"{
            "Global Quote": {
                "01. symbol": "IBM",
                "02. open": "191.2400",
                "03. high": "193.8800",
                "04. low": "190.6700",
                "05. price": "191.0700",
                "06. volume": "8828193",
                "07. latest trading day": "2024-03-15",
                "08. previous close": "193.4300",
                "09. change": "-2.3600",
                "10. change percent": "-1.2201%"
            }
        }"#;
        assert_eq!(parse_global_quote(body).unwrap(), 191.07);
    }

    #[test]
    fn test_unknown_symbol_has_empty_quote() {
        let err = parse_global_quote(r#"{"Global Quote": {}}"#).unwrap_err();
        assert!(err.to_string().contains("05. price"));
    }

    #[test]
    fn test_error_message_is_provider_error() {
        let body = r#"{"Error Message": "Invalid API call. Please retry or visit the documentation."}"#;
        assert!(matches!(
            parse_global_quote(body),
            Err(Error::Provider { .. })
        ));
    }

    #[test]
    fn test_rate_limit_note() {
        let body = r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#;
        let err = parse_global_quote(body).unwrap_err();
        assert!(err.to_string().contains("rate limited"));
    }
}
