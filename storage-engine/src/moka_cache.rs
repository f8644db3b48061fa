use async_trait::async_trait;
use dashmap::DashMap;
use moka::Expiry;
use moka::future::Cache;
use quote_engine::domain::{CacheKey, Record};
use quote_engine::ports::CacheStore;
use shared::{Error, Result, TtlSecs};
use std::fmt::Debug;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Clone)]
struct StoredRecord {
    record: Record,
    ttl: Option<TtlSecs>,
}

/// Expires each record after the TTL it was written with; `None` never expires
struct PerRecordTtl;

impl Expiry<CacheKey, StoredRecord> for PerRecordTtl {
    fn expire_after_create(
        &self,
        _key: &CacheKey,
        value: &StoredRecord,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl.map(|t| t.as_duration())
    }

    // an overwrite restarts the clock with the new record's TTL
    fn expire_after_update(
        &self,
        _key: &CacheKey,
        value: &StoredRecord,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl.map(|t| t.as_duration())
    }
}

/// Moka-based store with per-record TTL and never-expiring list bins
/// Records are lock-free and optionally size bounded; lists are held in a sharded map
pub struct MokaCacheStore {
    records: Cache<CacheKey, StoredRecord>,
    lists: DashMap<(CacheKey, String), Vec<String>>,
}

impl MokaCacheStore {
    /// Create a store, bounded to `max_entries` records when given
    pub fn new(name: &str, max_entries: Option<u64>) -> Self {
        let mut builder = Cache::builder().name(name).expire_after(PerRecordTtl);

        if let Some(capacity) = max_entries {
            builder = builder.max_capacity(capacity);
        }

        Self {
            records: builder.build(),
            lists: DashMap::new(),
        }
    }
}

#[async_trait]
impl CacheStore for MokaCacheStore {
    async fn get(&self, key: &CacheKey) -> Result<Record> {
        match self.records.get(key).await {
            Some(stored) => Ok(stored.record),
            None => Err(Error::NotFound), // Either doesn't exist or TTL expired
        }
    }

    async fn put(&self, key: CacheKey, record: Record, ttl: Option<TtlSecs>) -> Result<()> {
        debug!("Storing {} ({} bins, ttl {:?})", key, record.len(), ttl);
        self.records.insert(key, StoredRecord { record, ttl }).await;
        Ok(())
    }

    async fn list_read(&self, key: &CacheKey, bin: &str) -> Result<Vec<String>> {
        Ok(self
            .lists
            .get(&(key.clone(), bin.to_string()))
            .map(|list| list.value().clone())
            .unwrap_or_default())
    }

    async fn list_append(&self, key: &CacheKey, bin: &str, items: Vec<String>) -> Result<usize> {
        // the entry guard holds the shard lock for the whole append
        let mut list = self.lists.entry((key.clone(), bin.to_string())).or_default();
        list.extend(items);
        Ok(list.len())
    }

    async fn list_clear(&self, key: &CacheKey, bin: &str) -> Result<()> {
        self.lists.insert((key.clone(), bin.to_string()), Vec::new());
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }
}

impl Debug for MokaCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCacheStore")
            .field("entry_count", &self.records.entry_count())
            .field("weighted_size", &self.records.weighted_size())
            .field("lists", &self.lists.len())
            .finish()
    }
}
