use market_providers::{AlphaVantageClient, IexCloudClient, TwelveDataClient};
use quote_engine::aggregator::{PriceAggregator, Providers};
use quote_engine::planes::control::{CacheControlOperations, CacheControlRegistry};
use quote_engine::planes::data::{MarketDataOperations, MarketDataService};
use quote_engine::ports::CacheStore;
use quote_engine::quote_cache::QuoteCache;
use shared::config::Config;
use std::sync::Arc;
use storage_engine::MokaCacheStore;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub market_data: Arc<dyn MarketDataOperations>,
    pub cache_control: Arc<dyn CacheControlOperations>,
    pub store: Arc<dyn CacheStore>,
    pub service_version: String,
}

impl AppState {
    /// Wire the engine over an existing store and provider set
    pub fn new(config: &Config, store: Arc<dyn CacheStore>, providers: Providers) -> Self {
        let cache_control = Arc::new(CacheControlRegistry::new(store.clone()));
        let aggregator = PriceAggregator::new(providers, config.provider_timeout);
        let market_data = Arc::new(MarketDataService::new(
            QuoteCache::new(store.clone(), config.cache_ttl),
            cache_control.clone(),
            aggregator,
        ));

        Self {
            market_data,
            cache_control,
            store,
            service_version: config.service_version.clone(),
        }
    }

    /// Moka-backed store and the HTTP provider clients
    pub fn from_config(config: &Config) -> Self {
        let store = Arc::new(MokaCacheStore::new("quotes", config.cache_max_entries));
        tracing::info!(
            "Cache store initialized (ttl={}s, max_entries={:?})",
            config.cache_ttl.0,
            config.cache_max_entries
        );

        let twelve_data = Arc::new(TwelveDataClient::new(
            config.twelve_data_api_key.clone(),
            config.provider_timeout,
        ));
        let providers = Providers {
            trade: twelve_data.clone(),
            intraday: Arc::new(IexCloudClient::new(
                config.iex_api_key.clone(),
                config.provider_timeout,
            )),
            global: Arc::new(AlphaVantageClient::new(
                config.alpha_vantage_api_key.clone(),
                config.provider_timeout,
            )),
            time_series: twelve_data,
        };

        Self::new(config, store, providers)
    }
}
