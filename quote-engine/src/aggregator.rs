use crate::domain::{AggregatedPrice, DetailedQuote, IndicesSnapshot, Source};
use crate::ports::{
    GlobalQuoteProvider, IntradayQuoteProvider, TimeSeriesProvider, TradePriceProvider,
};
use chrono::Utc;
use shared::{Error, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Upstream providers wired into the aggregator
#[derive(Clone)]
pub struct Providers {
    pub trade: Arc<dyn TradePriceProvider>,
    pub intraday: Arc<dyn IntradayQuoteProvider>,
    pub global: Arc<dyn GlobalQuoteProvider>,
    pub time_series: Arc<dyn TimeSeriesProvider>,
}

/// Combines or falls back between upstream providers
///
/// Every upstream call is bounded by `call_timeout`; a slow provider fails on
/// its own without holding up the others.
#[derive(Clone)]
pub struct PriceAggregator {
    providers: Providers,
    call_timeout: Duration,
}

impl std::fmt::Debug for PriceAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceAggregator")
            .field("trade", &self.providers.trade.name())
            .field("intraday", &self.providers.intraday.name())
            .field("global", &self.providers.global.name())
            .field("time_series", &self.providers.time_series.name())
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}

impl PriceAggregator {
    pub fn new(providers: Providers, call_timeout: Duration) -> Self {
        Self {
            providers,
            call_timeout,
        }
    }

    /// Best single live price: intraday mid, else last trade
    pub async fn latest_price(&self, symbol: &str) -> Result<AggregatedPrice> {
        let intraday = &self.providers.intraday;
        match self.bounded(intraday.name(), intraday.bid_ask(symbol)).await {
            Ok(Some(quote)) => {
                if let Some(mid) = quote.mid() {
                    return Ok(priced(symbol, mid, Source::Live(intraday.name().to_string())));
                }
                debug!("{} bid/ask unusable for {}: {:?}", intraday.name(), symbol, quote);
            }
            Ok(None) => debug!("{} has no quote for {}", intraday.name(), symbol),
            Err(e) => warn!("{} failed for {}, falling back: {}", intraday.name(), symbol, e),
        }

        let trade = &self.providers.trade;
        match self.bounded(trade.name(), trade.trade_price(symbol)).await {
            Ok(price) if usable(price) => {
                Ok(priced(symbol, price, Source::Live(trade.name().to_string())))
            }
            Ok(price) => {
                warn!("{} returned unusable price {} for {}", trade.name(), price, symbol);
                Err(Error::AllSourcesUnavailable(symbol.to_string()))
            }
            Err(e) => {
                warn!("{} failed for {}: {}", trade.name(), symbol, e);
                Err(Error::AllSourcesUnavailable(symbol.to_string()))
            }
        }
    }

    /// Unweighted mean of every provider that produced a usable price
    ///
    /// The bid/ask leg contributes its mid only when both sides are positive.
    /// Failed, timed out and non-positive legs are left out of the mean.
    pub async fn aggregate_price(&self, symbol: &str) -> Result<AggregatedPrice> {
        let Providers {
            trade,
            intraday,
            global,
            ..
        } = &self.providers;

        let (trade_res, intraday_res, global_res) = tokio::join!(
            self.bounded(trade.name(), trade.trade_price(symbol)),
            self.bounded(intraday.name(), intraday.bid_ask(symbol)),
            self.bounded(global.name(), global.quote_price(symbol)),
        );

        let mut contributions: Vec<(&'static str, f64)> = Vec::with_capacity(3);

        match trade_res {
            Ok(p) if usable(p) => contributions.push((trade.name(), p)),
            Ok(p) => debug!("Excluding {} price {} for {}", trade.name(), p, symbol),
            Err(e) => warn!("Excluding {} for {}: {}", trade.name(), symbol, e),
        }
        match intraday_res {
            Ok(Some(quote)) => match quote.mid() {
                Some(mid) => contributions.push((intraday.name(), mid)),
                None => debug!("Excluding {} bid/ask {:?} for {}", intraday.name(), quote, symbol),
            },
            Ok(None) => debug!("Excluding {}: no quote for {}", intraday.name(), symbol),
            Err(e) => warn!("Excluding {} for {}: {}", intraday.name(), symbol, e),
        }
        match global_res {
            Ok(p) if usable(p) => contributions.push((global.name(), p)),
            Ok(p) => debug!("Excluding {} price {} for {}", global.name(), p, symbol),
            Err(e) => warn!("Excluding {} for {}: {}", global.name(), symbol, e),
        }

        if contributions.is_empty() {
            return Err(Error::AllSourcesUnavailable(symbol.to_string()));
        }

        let mean =
            contributions.iter().map(|(_, p)| p).sum::<f64>() / contributions.len() as f64;
        let names = contributions
            .into_iter()
            .map(|(name, _)| name.to_string())
            .collect();

        Ok(priced(symbol, mean, Source::Aggregate(names)))
    }

    pub async fn detailed_quote(&self, symbol: &str, interval: &str) -> Result<DetailedQuote> {
        let provider = &self.providers.time_series;
        self.bounded(provider.name(), provider.detailed_quote(symbol, interval))
            .await
    }

    pub async fn indices(&self) -> Result<IndicesSnapshot> {
        let provider = &self.providers.time_series;
        self.bounded(provider.name(), provider.indices()).await
    }

    pub fn time_series_name(&self) -> &'static str {
        self.providers.time_series.name()
    }

    async fn bounded<T>(
        &self,
        provider: &str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                provider: provider.to_string(),
            }),
        }
    }
}

fn usable(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

fn priced(symbol: &str, price: f64, source: Source) -> AggregatedPrice {
    AggregatedPrice {
        symbol: symbol.to_string(),
        price,
        source,
        timestamp: Utc::now(),
    }
}
