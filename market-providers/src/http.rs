use reqwest::{Client, StatusCode, Url};
use shared::{Error, Result};
use std::time::Duration;
use tracing::debug;

pub(crate) fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// GET `url` with query params and return the body text
///
/// `secret` is masked out of the logged URL.
pub(crate) async fn get_text(
    client: &Client,
    provider: &str,
    url: &str,
    params: &[(&str, &str)],
    secret: &str,
) -> Result<String> {
    let url = Url::parse_with_params(url, params)
        .map_err(|e| Error::provider(provider, format!("Failed to build URL: {}", e)))?;

    debug!("{} request: {}", provider, redact(url.as_str(), secret));

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            Error::Timeout {
                provider: provider.to_string(),
            }
        } else {
            Error::provider(provider, e.to_string())
        }
    })?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(Error::provider(provider, "rate limited"));
    }
    if !status.is_success() {
        return Err(Error::provider(provider, format!("HTTP {}", status)));
    }

    response
        .text()
        .await
        .map_err(|e| Error::provider(provider, e.to_string()))
}

pub(crate) fn redact(url: &str, secret: &str) -> String {
    if secret.is_empty() {
        url.to_string()
    } else {
        url.replace(secret, "***")
    }
}

/// Parse a numeric field that providers send as a JSON string
pub(crate) fn parse_number(provider: &str, field: &str, raw: Option<&str>) -> Result<f64> {
    let raw = raw.ok_or_else(|| Error::provider(provider, format!("missing field {}", field)))?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| Error::provider(provider, format!("invalid {} '{}'", field, raw)))
}
