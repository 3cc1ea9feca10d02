mod content;

use async_trait::async_trait;
use std::{future::Future, sync::Arc, time::Duration};
use wedding_error::StorageResult;

pub use content::ContentCacheKey;

/// Revoked token ids, kept until the token would have expired
pub const JWT_BLACKLIST_CACHE_NAME: &str = "JwtBlacklist";
/// Resolved public documents, flushed on every content write
pub const CONTENT_CACHE_NAME: &str = "ResolvedContent";

/// Namespaced key/value cache.
///
/// Keys are plain strings; implementations prefix them with [`name`](Self::name)
/// so two caches can live in the same backend.
#[async_trait]
pub trait WedBaseCache: Send + Sync + 'static {
    type Value: Clone + Send + Sync + 'static;

    fn name(&self) -> &str;

    async fn get(&self, key: String) -> StorageResult<Option<Self::Value>>;

    /// Uses the TTL the cache was built with, if any
    async fn set(&self, key: String, value: Self::Value) -> StorageResult<()>;

    /// A zero `ttl` is rejected
    async fn set_with_ttl(
        &self,
        key: String,
        value: Self::Value,
        ttl: Duration,
    ) -> StorageResult<()>;

    /// Returns whether the key was present
    async fn delete(&self, key: String) -> StorageResult<bool>;

    /// Returns how many entries were dropped
    async fn delete_all(&self) -> StorageResult<u64>;

    async fn exists(&self, key: String) -> StorageResult<bool>;
}

#[async_trait]
impl<C> WedBaseCache for Arc<C>
where
    C: WedBaseCache + ?Sized,
{
    type Value = C::Value;

    fn name(&self) -> &str {
        self.as_ref().name()
    }

    async fn get(&self, key: String) -> StorageResult<Option<C::Value>> {
        self.as_ref().get(key).await
    }

    async fn set(&self, key: String, value: C::Value) -> StorageResult<()> {
        self.as_ref().set(key, value).await
    }

    async fn set_with_ttl(&self, key: String, value: C::Value, ttl: Duration) -> StorageResult<()> {
        self.as_ref().set_with_ttl(key, value, ttl).await
    }

    async fn delete(&self, key: String) -> StorageResult<bool> {
        self.as_ref().delete(key).await
    }

    async fn delete_all(&self) -> StorageResult<u64> {
        self.as_ref().delete_all().await
    }

    async fn exists(&self, key: String) -> StorageResult<bool> {
        self.as_ref().exists(key).await
    }
}

/// Read-through helper over any [`WedBaseCache`]
#[async_trait]
pub trait WedCacheExt: WedBaseCache {
    /// On a miss, `load` runs once and its value is stored under `key`.
    /// A failing `load` stores nothing.
    async fn get_or_create<F, Fut>(&self, key: String, load: F) -> StorageResult<Self::Value>
    where
        F: FnOnce(String) -> Fut + Send + Sync,
        Fut: Future<Output = StorageResult<Self::Value>> + Send;
}

#[async_trait]
impl<C: WedBaseCache + ?Sized> WedCacheExt for C {
    async fn get_or_create<F, Fut>(&self, key: String, load: F) -> StorageResult<C::Value>
    where
        F: FnOnce(String) -> Fut + Send + Sync,
        Fut: Future<Output = StorageResult<C::Value>> + Send,
    {
        match self.get(key.clone()).await? {
            Some(hit) => Ok(hit),
            None => {
                let fresh = load(key.clone()).await?;
                self.set(key, fresh.clone()).await?;
                Ok(fresh)
            }
        }
    }
}
