// shared/src/lib.rs

use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Key absent or expired in the cache store
    #[error("not found")]
    NotFound,
    #[error("cache store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("malformed cache record: {0}")]
    MalformedRecord(String),
    #[error("provider {provider} failed: {message}")]
    Provider { provider: String, message: String },
    #[error("provider {provider} timed out")]
    Timeout { provider: String },
    #[error("all sources unavailable: {0}")]
    AllSourcesUnavailable(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl Error {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// True for failures of a single upstream call
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Error::Provider { .. } | Error::Timeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Record lifetime in whole seconds, applied per record at write time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtlSecs(pub u64);

impl TtlSecs {
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }
}

pub mod config;
