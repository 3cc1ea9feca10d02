pub mod cache;
pub mod constants;
pub mod domain;
pub mod entities;
pub mod enums;
pub mod export;
mod idens;
pub mod initializer;
pub mod listing;
pub mod settings;
pub mod web;

use crate::cache::WedBaseCache;
use async_trait::async_trait;
use downcast_rs::{impl_downcast, DowncastSync};
use sea_orm::DatabaseConnection;
use settings::Settings;
use std::{sync::Arc, time::Duration};
use wedding_error::{
    init::InitContextError,
    storage::{CacheError, StorageError},
    WedResult,
};

impl_downcast!(sync WebServer);
impl_downcast!(sync DbManager);
impl_downcast!(sync CacheProvider);

/// Database management interface.
///
/// Owns the connection pool and runs the migrator on startup.
#[async_trait]
pub trait DbManager: DowncastSync + Send + Sync + 'static {
    /// Opens the pool and brings the schema up to date.
    async fn init(settings: &Settings) -> WedResult<Arc<Self>, InitContextError>
    where
        Self: Sized;

    /// Retrieves a database connection from the pool.
    fn get_connection(&self) -> WedResult<DatabaseConnection, StorageError>;

    /// Gracefully closes all database connections.
    async fn close(&self) -> WedResult<()>;
}

/// Cache provider interface.
///
/// Caches are registered by name and value type at startup and looked up by
/// the same pair afterwards.
#[async_trait]
pub trait CacheProvider: DowncastSync + Send + Sync + 'static {
    async fn init(settings: &Settings) -> WedResult<Arc<Self>, InitContextError>
    where
        Self: Sized;

    /// Create a cache instance for a specific value type.
    ///
    /// # Arguments
    /// * `cache_name` - The name of the cache
    /// * `max_capacity` - The maximum capacity of the cache
    /// * `ttl` - The default time to live of each entry
    fn create_cache<V>(
        &mut self,
        cache_name: &str,
        max_capacity: Option<u64>,
        ttl: Option<Duration>,
    ) -> WedResult<(), CacheError>
    where
        Self: Sized,
        V: Clone + Send + Sync + 'static;

    /// Retrieves a previously created cache for a specific value type.
    fn get_cache<V>(
        &self,
        cache_name: &str,
    ) -> WedResult<Arc<dyn WedBaseCache<Value = V> + Send + Sync>, CacheError>
    where
        Self: Sized,
        V: Clone + Send + Sync + 'static;
}

/// HTTP server lifecycle.
#[async_trait]
pub trait WebServer: DowncastSync + Send + Sync + 'static {
    /// Binds the listener and starts serving in the background.
    async fn init(
        settings: &Settings,
        db_manager: Arc<dyn DbManager>,
        cache_provider: Arc<dyn CacheProvider>,
    ) -> WedResult<Arc<Self>, InitContextError>
    where
        Self: Sized;

    /// Stops accepting connections and waits for in-flight requests.
    async fn stop(&self) -> WedResult<()>;
}
