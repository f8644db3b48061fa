use crate::domain::response::{DetailedQuoteResponse, IndicesResponse, PriceResponse};
use async_trait::async_trait;
use shared::Result;

#[async_trait]
pub trait MarketDataOperations: Send + Sync + 'static {
    async fn latest_price(&self, symbol: &str) -> Result<PriceResponse>;
    async fn aggregate_price(&self, symbol: &str) -> Result<PriceResponse>;
    async fn detailed_quote(
        &self,
        symbol: &str,
        interval: Option<&str>,
    ) -> Result<DetailedQuoteResponse>;
    async fn indices(&self) -> Result<IndicesResponse>;
}
