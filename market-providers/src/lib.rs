//! HTTP clients for the upstream quote providers.
//!
//! Each client implements one or more of the provider ports from `quote_engine::ports`.
//! Provider payloads are JSON; nothing here touches the cache blob format.

mod alpha_vantage;
mod http;
mod iex;
mod twelve_data;

pub use alpha_vantage::AlphaVantageClient;
pub use iex::IexCloudClient;
pub use twelve_data::TwelveDataClient;
