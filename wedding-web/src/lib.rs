//! Web server for the wedding site: admin API, guest-facing API, uploaded
//! media files and the static frontend.
mod api;
mod middleware;
mod site;
mod upload;
mod validation;

use actix_web::{
    dev::{Server, ServerHandle},
    middleware::{Logger, NormalizePath},
    web::{self, Data},
    App, HttpServer,
};
use async_trait::async_trait;
use middleware::cors::middleware;
use sea_orm::DatabaseConnection;
use serde_json::Value as Json;
use site::SiteConfig;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};
use validation::{manager::ValidationManager, prelude::create_default_manager};
use wedding_cms::Schema;
use wedding_error::{init::InitContextError, storage::StorageError, WedError, WedResult};
use wedding_models::{
    cache::{WedBaseCache, CONTENT_CACHE_NAME, JWT_BLACKLIST_CACHE_NAME},
    settings::Settings,
    CacheProvider, DbManager, WebServer,
};
use wedding_storage::{MediaStore, WedCacheProvider};

type SharedCache<V> = Arc<dyn WedBaseCache<Value = V> + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    settings: Settings,
    db: DatabaseConnection,
    validator: Arc<ValidationManager>,
    media: MediaStore,
    schema: Arc<Schema>,
    jwt_blacklist: SharedCache<()>,
    content_cache: SharedCache<Json>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        db: DatabaseConnection,
        caches: &WedCacheProvider,
    ) -> WedResult<Self> {
        let jwt_blacklist = caches
            .get_cache::<()>(JWT_BLACKLIST_CACHE_NAME)
            .map_err(StorageError::from)?;
        let content_cache = caches
            .get_cache::<Json>(CONTENT_CACHE_NAME)
            .map_err(StorageError::from)?;
        let media = MediaStore::new(settings.media.root_dir.as_str());
        Ok(Self {
            settings,
            db,
            validator: Arc::new(create_default_manager()),
            media,
            schema: Arc::new(Schema::wedding()),
            jwt_blacklist,
            content_cache,
        })
    }

    /// Drops every cached public content response.
    pub(crate) async fn invalidate_content(&self) -> WedResult<()> {
        let dropped = self
            .content_cache
            .delete_all()
            .await
            .map_err(WedError::from)?;
        tracing::debug!(dropped, "Content cache cleared");
        Ok(())
    }
}

/// Registers every route. The site fallback, when enabled, goes last so it
/// only sees requests nothing else matched.
pub(crate) fn configure_app(cfg: &mut web::ServiceConfig, settings: &Settings) {
    cfg.configure(|cfg| api::configure_public_routes(cfg, &settings.media.url_prefix))
        .service(web::scope(&settings.web.router_prefix).configure(api::configure_routes));
    if settings.web.site.enabled {
        cfg.app_data(Data::new(SiteConfig::from_settings(settings)))
            .configure(site::configure_site_routes);
    }
}

/// WedWebServer owns the running actix server
#[derive(Clone)]
pub struct WedWebServer {
    /// Server handle for graceful shutdown
    server: Arc<Mutex<Option<ServerHandle>>>,
}

impl WedWebServer {
    async fn create_server(
        settings: &Settings,
        db_manager: Arc<dyn DbManager>,
        cache_provider: Arc<dyn CacheProvider>,
    ) -> WedResult<Server> {
        let caches = cache_provider
            .downcast_ref::<WedCacheProvider>()
            .ok_or(WedError::from("Cache provider is not a WedCacheProvider"))?;
        let state = AppState::new(settings.clone(), db_manager.get_connection()?, caches)?;
        state.media.ensure_root().await?;

        let addr = format!("{}:{}", settings.web.host, settings.web.port);
        let worker_count = settings.web.get_worker_count();
        let settings = settings.clone();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(Data::new(state.clone()))
                .wrap(middleware(&settings.web.cors))
                .wrap(Logger::default())
                .wrap(NormalizePath::trim())
                .configure(|cfg| configure_app(cfg, &settings))
        })
        .workers(worker_count)
        .bind(&addr)
        .map_err(|e| WedError::from(format!("Failed to bind HTTP server to {addr}: {e}")))?;

        info!(%addr, workers = worker_count, "HTTP server bound");
        Ok(server.run())
    }
}

#[async_trait]
impl WebServer for WedWebServer {
    #[inline]
    #[instrument(name = "init-web-server", skip_all)]
    async fn init(
        settings: &Settings,
        db_manager: Arc<dyn DbManager>,
        cache_provider: Arc<dyn CacheProvider>,
    ) -> WedResult<Arc<Self>, InitContextError> {
        let server = Self::create_server(settings, db_manager, cache_provider)
            .await
            .map_err(|e| {
                InitContextError::Primitive(format!("Failed to create web server: {e}"))
            })?;
        let server_handle = server.handle();

        tokio::spawn(async move {
            if let Err(e) = server.await {
                error!(error = %e, "Web server stopped with an error");
            }
        });

        Ok(Arc::new(WedWebServer {
            server: Arc::new(Mutex::new(Some(server_handle))),
        }))
    }

    #[inline]
    #[instrument(name = "web-server-stop", skip_all)]
    async fn stop(&self) -> WedResult<()> {
        info!("Stopping web server...");
        if let Some(handle) = self.server.lock().await.take() {
            handle.stop(true).await;
        }
        info!("Web server stopped");
        Ok(())
    }
}
