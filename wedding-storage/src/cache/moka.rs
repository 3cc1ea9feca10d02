use async_trait::async_trait;
use moka::{
    future::{Cache as MokaInner, CacheBuilder},
    Expiry,
};
use std::time::{Duration, Instant};
use wedding_error::{storage::CacheError, StorageResult};
use wedding_models::cache::WedBaseCache;

/// Cached value plus the ttl it was written with, if it overrides the cache default.
#[derive(Clone)]
pub struct CacheItem<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub value: V,
    pub ttl: Option<Duration>,
}

/// Per-entry expiry: the entry's own ttl wins over the cache-wide default.
pub struct MokaExpiry {
    ttl: Option<Duration>,
}

impl MokaExpiry {
    #[inline]
    fn ttl_of<V: Clone + Send + Sync + 'static>(&self, item: &CacheItem<V>) -> Option<Duration> {
        item.ttl.or(self.ttl)
    }
}

impl<K, V> Expiry<K, CacheItem<V>> for MokaExpiry
where
    V: Clone + Send + Sync + 'static,
{
    fn expire_after_create(&self, _key: &K, item: &CacheItem<V>, _: Instant) -> Option<Duration> {
        self.ttl_of(item)
    }

    fn expire_after_update(
        &self,
        _key: &K,
        item: &CacheItem<V>,
        _: Instant,
        _current: Option<Duration>,
    ) -> Option<Duration> {
        self.ttl_of(item)
    }
}

/// In-process cache backed by `moka`. Keys are stored as `{prefix}:{key}`.
pub struct MokaCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    name: String,
    prefix: String,
    inner: MokaInner<String, CacheItem<V>>,
}

impl<V> MokaCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(
        name: String,
        prefix: String,
        max_capacity: Option<u64>,
        ttl: Option<Duration>,
    ) -> Self {
        let mut builder = CacheBuilder::default().expire_after(MokaExpiry { ttl });
        if let Some(max_capacity) = max_capacity {
            builder = builder.max_capacity(max_capacity);
        }

        Self {
            name,
            prefix,
            inner: builder.build(),
        }
    }

    #[inline]
    fn full_key(&self, key: String) -> String {
        if self.prefix.is_empty() {
            key
        } else {
            format!("{}:{key}", self.prefix)
        }
    }

    async fn insert(&self, key: String, value: V, ttl: Option<Duration>) {
        let full_key = self.full_key(key);
        self.inner.insert(full_key, CacheItem { value, ttl }).await;
    }
}

#[async_trait]
impl<V> WedBaseCache for MokaCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    type Value = V;

    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    async fn get(&self, key: String) -> StorageResult<Option<Self::Value>> {
        let full_key = self.full_key(key);
        Ok(self.inner.get(&full_key).await.map(|item| item.value))
    }

    #[inline]
    async fn set(&self, key: String, value: Self::Value) -> StorageResult<()> {
        self.insert(key, value, None).await;
        Ok(())
    }

    async fn set_with_ttl(
        &self,
        key: String,
        value: Self::Value,
        ttl: Duration,
    ) -> StorageResult<()> {
        if ttl.is_zero() {
            return Err(CacheError::InvalidTtl("ttl must be > 0".into()).into());
        }
        self.insert(key, value, Some(ttl)).await;
        Ok(())
    }

    async fn delete(&self, key: String) -> StorageResult<bool> {
        let full_key = self.full_key(key);
        Ok(self.inner.remove(&full_key).await.is_some())
    }

    /// Returns how many entries the cache held before it was cleared.
    async fn delete_all(&self) -> StorageResult<u64> {
        self.inner.run_pending_tasks().await;
        let count = self.inner.entry_count();
        self.inner.invalidate_all();
        Ok(count)
    }

    #[inline]
    async fn exists(&self, key: String) -> StorageResult<bool> {
        let full_key = self.full_key(key);
        Ok(self.inner.contains_key(&full_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wedding_error::storage::StorageError;

    fn cache(ttl: Option<Duration>) -> MokaCache<String> {
        MokaCache::new("test".into(), "wed:test".into(), Some(100), ttl)
    }

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = cache(None);
        cache.set("a".into(), "one".into()).await.unwrap();
        assert_eq!(cache.get("a".into()).await.unwrap().as_deref(), Some("one"));
        assert!(cache.exists("a".into()).await.unwrap());

        assert!(cache.delete("a".into()).await.unwrap());
        assert!(!cache.delete("a".into()).await.unwrap());
        assert_eq!(cache.get("a".into()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entry_ttl_expires() {
        let cache = cache(Some(Duration::from_secs(60)));
        cache
            .set_with_ttl("short".into(), "x".into(), Duration::from_millis(30))
            .await
            .unwrap();
        cache.set("long".into(), "y".into()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(cache.get("short".into()).await.unwrap(), None);
        assert!(cache.exists("long".into()).await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_ttls_rejected() {
        let cache = cache(None);
        let zero = cache
            .set_with_ttl("k".into(), "v".into(), Duration::ZERO)
            .await;
        assert!(matches!(
            zero,
            Err(StorageError::CacheKind(CacheError::InvalidTtl(_)))
        ));

        cache
            .set_with_ttl("k".into(), "v".into(), Duration::from_secs(300))
            .await
            .unwrap();
        assert!(cache.exists("k".into()).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_all() {
        let cache = cache(None);
        for key in ["home", "page:travel", "settings:siteSettings"] {
            cache.set(key.into(), key.to_uppercase()).await.unwrap();
        }
        assert_eq!(cache.delete_all().await.unwrap(), 3);
        assert!(!cache.exists("home".into()).await.unwrap());
    }
}
