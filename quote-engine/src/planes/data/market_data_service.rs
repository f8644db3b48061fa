use crate::aggregator::PriceAggregator;
use crate::domain::response::{DetailedQuoteResponse, IndicesResponse, PriceResponse};
use crate::domain::{PriceCategory, Source, names};
use crate::planes::control::CacheControlOperations;
use crate::planes::data::operation::MarketDataOperations;
use crate::quote_cache::QuoteCache;
use async_trait::async_trait;
use shared::{Error, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_INTERVAL: &str = "1min";

/// Per-request flow: check bypass, check cache, fetch live, write back
///
/// Every response carries a `Source` telling whether it came from the cache or
/// which provider(s) produced it live.
#[derive(Clone)]
pub struct MarketDataService {
    cache: QuoteCache,
    control: Arc<dyn CacheControlOperations>,
    aggregator: PriceAggregator,
}

impl std::fmt::Debug for MarketDataService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataService")
            .field("ttl", &self.cache.ttl())
            .field("aggregator", &self.aggregator)
            .finish()
    }
}

impl MarketDataService {
    pub fn new(
        cache: QuoteCache,
        control: Arc<dyn CacheControlOperations>,
        aggregator: PriceAggregator,
    ) -> Self {
        Self {
            cache,
            control,
            aggregator,
        }
    }

    /// Control state is read fresh each time; a store failure means "not bypassed"
    async fn bypassed(&self, symbol: &str) -> bool {
        match self.control.is_bypassed(symbol).await {
            Ok(true) => {
                debug!("Cache bypassed for {}", symbol);
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!("Cache control unreadable, using cache for {}: {}", symbol, e);
                false
            }
        }
    }

    async fn price(&self, symbol: &str, category: PriceCategory) -> Result<PriceResponse> {
        let symbol = normalize(symbol)?;
        let bypass = self.bypassed(&symbol).await;

        if !bypass {
            if let Some(price) = self.cache.get_price(&symbol, category).await {
                return Ok(PriceResponse::new(symbol, price, Source::cached_price(category)));
            }
        }

        let live = match category {
            PriceCategory::Latest => self.aggregator.latest_price(&symbol).await?,
            PriceCategory::Aggregate => self.aggregator.aggregate_price(&symbol).await?,
        };
        info!("{:?} price for {} served live by {}", category, symbol, live.source);

        if !bypass {
            self.cache.put_price(&symbol, category, live.price).await;
        }
        Ok(PriceResponse {
            symbol,
            price: live.price,
            timestamp: live.timestamp,
            source: live.source,
        })
    }
}

#[async_trait]
impl MarketDataOperations for MarketDataService {
    async fn latest_price(&self, symbol: &str) -> Result<PriceResponse> {
        self.price(symbol, PriceCategory::Latest).await
    }

    async fn aggregate_price(&self, symbol: &str) -> Result<PriceResponse> {
        self.price(symbol, PriceCategory::Aggregate).await
    }

    async fn detailed_quote(
        &self,
        symbol: &str,
        interval: Option<&str>,
    ) -> Result<DetailedQuoteResponse> {
        let symbol = normalize(symbol)?;
        let interval = interval
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .unwrap_or(DEFAULT_INTERVAL);
        let bypass = self.bypassed(&symbol).await;

        if !bypass {
            if let Some(quote) = self.cache.get_detailed_quote(&symbol).await {
                return Ok(DetailedQuoteResponse::new(quote, Source::CachedDetailedQuote));
            }
        }

        let quote = self.aggregator.detailed_quote(&symbol, interval).await?;
        info!("Detailed quote for {} ({}) served live", symbol, interval);

        if !bypass {
            self.cache.put_detailed_quote(&quote).await;
        }
        let source = Source::Live(self.aggregator.time_series_name().to_string());
        Ok(DetailedQuoteResponse::new(quote, source))
    }

    async fn indices(&self) -> Result<IndicesResponse> {
        let bypass = self.bypassed(names::INDICES_PSEUDO_SYMBOL).await;

        if !bypass {
            if let Some(snapshot) = self.cache.get_indices().await {
                return Ok(IndicesResponse::new(snapshot.to_indices(), Source::CachedIndices));
            }
        }

        let snapshot = self.aggregator.indices().await?;
        info!("Indices served live");

        if !bypass {
            self.cache.put_indices(&snapshot).await;
        }
        let source = Source::Live(self.aggregator.time_series_name().to_string());
        Ok(IndicesResponse::new(snapshot.to_indices(), source))
    }
}

fn normalize(symbol: &str) -> Result<String> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(Error::InvalidInput("symbol must not be empty".to_string()));
    }
    Ok(symbol)
}
