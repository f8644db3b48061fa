use async_trait::async_trait;

use shared::Result;

/// Administrative cache bypass state, read fresh from the store on every call
#[async_trait]
pub trait CacheControlOperations: Send + Sync + 'static {
    async fn get_global_disable(&self) -> Result<bool>;
    async fn set_global_disable(&self, disabled: bool) -> Result<()>;
    async fn get_disabled_symbols(&self) -> Result<Vec<String>>;
    async fn append_disabled_symbols(&self, symbols: Vec<String>) -> Result<usize>;
    async fn clear_disabled_symbols(&self) -> Result<()>;

    /// Global disable, or `symbol` present in the disabled list
    async fn is_bypassed(&self, symbol: &str) -> Result<bool>;
}
