mod cache;
mod media;
mod migration;
mod sql;

pub use media::{MediaStore, StagedUpload};
pub use sql::sqlite::connect_in_memory;

use crate::cache::moka::MokaCache;
use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use sql::sqlite;
use std::{any::Any, collections::HashMap, sync::Arc, time::Duration};
use tracing::{info, instrument};
use wedding_error::{
    init::InitContextError,
    storage::{CacheError, StorageError},
    WedResult,
};
use wedding_models::{
    cache::{WedBaseCache, CONTENT_CACHE_NAME, JWT_BLACKLIST_CACHE_NAME},
    settings::{CacheType, Settings},
    CacheProvider, DbManager,
};

/// Owns the SQLite pool for the lifetime of the process.
pub struct WedDbManager {
    db_conn: Option<DatabaseConnection>,
}

#[async_trait]
impl DbManager for WedDbManager {
    #[instrument(name = "init-db-manager", skip_all)]
    async fn init(settings: &Settings) -> WedResult<Arc<Self>, InitContextError> {
        let db = sqlite::init_db(&settings.db.sqlite).await.map_err(|e| {
            InitContextError::Primitive(format!("Failed to init SQLite database: {e}"))
        })?;

        Migrator::up(&db, None).await.map_err(|e| {
            InitContextError::Primitive(format!("Failed to migrate SQLite database: {e}"))
        })?;

        info!("Database manager initialized");
        Ok(Arc::new(WedDbManager { db_conn: Some(db) }))
    }

    #[inline]
    fn get_connection(&self) -> WedResult<DatabaseConnection, StorageError> {
        self.db_conn
            .as_ref()
            .ok_or(StorageError::StorageUnavailable)
            .cloned()
    }

    #[instrument(name = "close-db", skip_all)]
    async fn close(&self) -> WedResult<()> {
        if let Some(db) = &self.db_conn {
            db.clone().close().await?;
        }
        info!("Database connections closed");
        Ok(())
    }
}

/// Named caches, each stored type-erased as `Arc<dyn WedBaseCache<Value = V>>`.
#[derive(Debug)]
pub struct WedCacheProvider {
    prefix: String,
    delimiter: String,
    cache_type: CacheType,
    caches: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl WedCacheProvider {
    pub fn new(prefix: &str, delimiter: &str, cache_type: CacheType) -> Self {
        Self {
            prefix: prefix.into(),
            delimiter: delimiter.into(),
            cache_type,
            caches: HashMap::new(),
        }
    }

    #[instrument(name = "init-caches", skip_all)]
    fn init_caches(&mut self, settings: &Settings) -> WedResult<(), CacheError> {
        // blacklisted token ids live as long as the token itself could
        self.create_cache::<()>(
            JWT_BLACKLIST_CACHE_NAME,
            Some(10_000),
            Some(Duration::from_millis(settings.web.jwt.expire.max(1) as u64)),
        )?;
        self.create_cache::<serde_json::Value>(
            CONTENT_CACHE_NAME,
            Some(1_000),
            Some(Duration::from_secs(settings.cache.content_ttl_secs.max(1))),
        )?;
        Ok(())
    }
}

#[async_trait]
impl CacheProvider for WedCacheProvider {
    #[instrument(name = "init-cache-provider", skip_all)]
    async fn init(settings: &Settings) -> WedResult<Arc<Self>, InitContextError> {
        let mut provider = Self::new(
            &settings.cache.prefix,
            &settings.cache.delimiter,
            settings.cache.r#type,
        );
        provider.init_caches(settings).map_err(|e| {
            InitContextError::Primitive(format!("Failed to initialize caches: {e}"))
        })?;
        Ok(Arc::new(provider))
    }

    fn create_cache<V: Clone + Send + Sync + 'static>(
        &mut self,
        cache_name: &str,
        max_capacity: Option<u64>,
        ttl: Option<Duration>,
    ) -> WedResult<(), CacheError> {
        if self.caches.contains_key(cache_name) {
            return Err(CacheError::AlreadyExists(cache_name.to_string()));
        }

        let full_prefix = format!("{}{}{}", self.prefix, self.delimiter, cache_name);
        let cache = match self.cache_type {
            CacheType::Moka => {
                MokaCache::<V>::new(cache_name.to_string(), full_prefix, max_capacity, ttl)
            }
        };
        let cache: Arc<dyn WedBaseCache<Value = V> + Send + Sync> = Arc::new(cache);
        self.caches.insert(cache_name.to_string(), Arc::new(cache));
        info!(cache = cache_name, "Cache created");
        Ok(())
    }

    fn get_cache<V>(
        &self,
        cache_name: &str,
    ) -> WedResult<Arc<dyn WedBaseCache<Value = V> + Send + Sync>, CacheError>
    where
        V: Clone + Send + Sync + 'static,
    {
        self.caches
            .get(cache_name)
            .and_then(|cache| {
                cache
                    .downcast_ref::<Arc<dyn WedBaseCache<Value = V> + Send + Sync>>()
                    .map(Arc::clone)
            })
            .ok_or(CacheError::NotFound(cache_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{EntityTrait, PaginatorTrait};
    use wedding_models::entities::prelude::{AdminUser, CmsDocument};

    #[tokio::test]
    async fn test_cache_provider_registers_named_caches() {
        let provider = WedCacheProvider::init(&Settings::default()).await.unwrap();

        let blacklist = provider.get_cache::<()>(JWT_BLACKLIST_CACHE_NAME).unwrap();
        blacklist.set("jti-1".into(), ()).await.unwrap();
        assert!(blacklist.exists("jti-1".into()).await.unwrap());

        let content = provider
            .get_cache::<serde_json::Value>(CONTENT_CACHE_NAME)
            .unwrap();
        assert_eq!(content.name(), CONTENT_CACHE_NAME);

        // wrong value type and unknown names are both "not found"
        assert!(matches!(
            provider.get_cache::<String>(JWT_BLACKLIST_CACHE_NAME),
            Err(CacheError::NotFound(_))
        ));
        assert!(provider.get_cache::<()>("nope").is_err());
    }

    #[test]
    fn test_duplicate_cache_rejected() {
        let mut provider = WedCacheProvider::new("wed", ":", CacheType::Moka);
        provider.create_cache::<u32>("counter", None, None).unwrap();
        assert!(matches!(
            provider.create_cache::<u32>("counter", None, None),
            Err(CacheError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_migration_seeds_admin_and_singletons() {
        let db = connect_in_memory().await.unwrap();
        assert_eq!(AdminUser::find().count(&db).await.unwrap(), 1);

        let singletons = CmsDocument::find().all(&db).await.unwrap();
        let mut ids: Vec<_> = singletons.iter().map(|d| d.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["navigation", "rsvpSettings", "siteSettings"]);
        assert!(singletons.iter().all(|d| d.id == d.doc_type && d.revision == 1));
    }
}
