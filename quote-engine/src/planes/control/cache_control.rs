use crate::domain::{BinValue, CacheKey, Record, names};
use crate::planes::control::operation::CacheControlOperations;
use crate::ports::CacheStore;
use async_trait::async_trait;
use shared::{Error, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// Registry for the global bypass flag and the disabled-symbols list
///
/// Both live in the shared store under a single never-expiring control record.
/// Nothing is cached in process, so administrative changes are visible to the
/// next request.
#[derive(Clone)]
pub struct CacheControlRegistry {
    store: Arc<dyn CacheStore>,
    key: CacheKey,
}

impl std::fmt::Debug for CacheControlRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheControlRegistry")
            .field("key", &self.key.to_string())
            .finish()
    }
}

impl CacheControlRegistry {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            key: CacheKey::new(names::SET_CACHE_CONTROL, names::CACHE_CONTROL_RECORD_KEY),
        }
    }
}

#[async_trait]
impl CacheControlOperations for CacheControlRegistry {
    async fn get_global_disable(&self) -> Result<bool> {
        match self.store.get(&self.key).await {
            Ok(record) => Ok(record.boolean(names::BIN_GLOBAL_DISABLED).unwrap_or(false)),
            Err(Error::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn set_global_disable(&self, disabled: bool) -> Result<()> {
        let record = Record::new().with_bin(names::BIN_GLOBAL_DISABLED, BinValue::Bool(disabled));
        self.store.put(self.key.clone(), record, None).await?;
        info!("Global cache bypass set to {}", disabled);
        Ok(())
    }

    async fn get_disabled_symbols(&self) -> Result<Vec<String>> {
        self.store
            .list_read(&self.key, names::BIN_DISABLED_SYMBOLS)
            .await
    }

    async fn append_disabled_symbols(&self, symbols: Vec<String>) -> Result<usize> {
        if symbols.is_empty() {
            return Err(Error::InvalidInput("no symbols to append".to_string()));
        }
        let appended = symbols.len();
        let len = self
            .store
            .list_append(&self.key, names::BIN_DISABLED_SYMBOLS, symbols)
            .await?;
        info!("Appended {} symbol(s) to cache bypass list, now {}", appended, len);
        Ok(len)
    }

    async fn clear_disabled_symbols(&self) -> Result<()> {
        self.store
            .list_clear(&self.key, names::BIN_DISABLED_SYMBOLS)
            .await?;
        info!("Cleared cache bypass list");
        Ok(())
    }

    async fn is_bypassed(&self, symbol: &str) -> Result<bool> {
        if self.get_global_disable().await? {
            debug!("Global cache bypass active for {}", symbol);
            return Ok(true);
        }
        let disabled = self.get_disabled_symbols().await?;
        Ok(disabled.iter().any(|s| s == symbol))
    }
}

/// Split a comma-separated symbol list, trimming and upper-casing each entry
pub fn parse_symbols_csv(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}
