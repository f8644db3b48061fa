use crate::TtlSecs;
use std::time::Duration;
use tracing::warn;

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub cache_ttl: TtlSecs,
    pub cache_max_entries: Option<u64>,
    pub provider_timeout: Duration,
    pub twelve_data_api_key: String,
    pub iex_api_key: String,
    pub alpha_vantage_api_key: String,
    pub service_version: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    const DEFAULT_HOST: &str = "0.0.0.0";
    const DEFAULT_HTTP_PORT: u16 = 8080;
    const DEFAULT_CACHE_TTL_SECS: u64 = 60;
    const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 5000;

    pub fn from_env() -> Self {
        let host = std::env::var("MDS_HOST").unwrap_or_else(|_| Self::DEFAULT_HOST.to_string());
        let http_port = std::env::var("MDS_HTTP_PORT")
            .unwrap_or_else(|_| Self::DEFAULT_HTTP_PORT.to_string())
            .parse::<u16>()
            .unwrap_or(Self::DEFAULT_HTTP_PORT);
        let cache_ttl_secs = std::env::var("MDS_CACHE_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_CACHE_TTL_SECS.to_string())
            .parse::<u64>()
            .unwrap_or(Self::DEFAULT_CACHE_TTL_SECS);
        let provider_timeout_ms = std::env::var("MDS_PROVIDER_TIMEOUT_MS")
            .unwrap_or_else(|_| Self::DEFAULT_PROVIDER_TIMEOUT_MS.to_string())
            .parse::<u64>()
            .unwrap_or(Self::DEFAULT_PROVIDER_TIMEOUT_MS);

        Self {
            host,
            http_port,
            cache_ttl: TtlSecs(cache_ttl_secs),
            cache_max_entries: std::env::var("MDS_CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse::<u64>().ok()),
            provider_timeout: Duration::from_millis(provider_timeout_ms),
            twelve_data_api_key: api_key("MDS_TWELVE_DATA_API_KEY"),
            iex_api_key: api_key("MDS_IEX_API_KEY"),
            alpha_vantage_api_key: api_key("MDS_ALPHA_VANTAGE_API_KEY"),
            service_version: std::env::var("MDS_SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            allowed_origins: std::env::var("MDS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

fn api_key(var: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| {
        warn!("{} not set, upstream calls to this provider will be rejected", var);
        String::new()
    })
}
