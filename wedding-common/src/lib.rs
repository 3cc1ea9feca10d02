//! Process-wide application context.
//!
//! Loads settings, starts logging, then brings up the database, the caches and
//! the web server in that order. Everything is torn down again on a shutdown
//! signal.
mod logger;

pub use wedding_error::{WedError, WedResult};

use logger::Logger;
use once_cell::sync::OnceCell;
use std::{
    future::Future,
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
#[cfg(windows)]
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::{RwLock, RwLockReadGuard};
use tokio_util::task::TaskTracker;
use tracing::{info, instrument, level_filters::LevelFilter, span, Level};
use wedding_models::{
    constants::{DATA_DIR, LOG_DIR},
    settings::Settings,
    CacheProvider, DbManager, WebServer,
};

static APP_CONTEXT: OnceCell<RwLock<WedAppContext>> = OnceCell::new();

pub struct WedAppContext {
    settings: Option<Settings>,
    logger: Logger,
    db_manager: Option<Arc<dyn DbManager>>,
    cache_provider: Option<Arc<dyn CacheProvider>>,
    web_server: Option<Arc<dyn WebServer>>,
    /// Set once the first shutdown starts
    shutting_down: AtomicBool,
}

impl WedAppContext {
    pub async fn instance() -> WedResult<RwLockReadGuard<'static, WedAppContext>> {
        Ok(APP_CONTEXT
            .get()
            .ok_or(WedError::from("WedAppContext is not initialized"))?
            .read()
            .await)
    }

    /// Builds the global context once. `config` is the path of the TOML file,
    /// which may be missing.
    pub async fn init<D, P, W>(config: String) -> WedResult<()>
    where
        D: DbManager + 'static,
        P: CacheProvider + 'static,
        W: WebServer + 'static,
    {
        let mut logger = Logger::new(if cfg!(debug_assertions) {
            Some(Level::DEBUG)
        } else {
            Some(Level::INFO)
        });

        // relative paths (data, media, logs) resolve against runtime_dir
        let settings = Settings::new(config)?;
        apply_runtime_dir(&settings.general.runtime_dir)?;
        logger.initialize()?;

        let span = span!(Level::INFO, "init-app");
        let _guard = span.enter();

        ensure_runtime_directories(Path::new("."), &settings)?;

        let mut ctx = WedAppContext {
            settings: Some(settings),
            logger,
            db_manager: None,
            cache_provider: None,
            web_server: None,
            shutting_down: AtomicBool::new(false),
        };

        ctx.init_db_manager::<D>().await?;
        ctx.init_cache_provider::<P>().await?;
        ctx.init_web_server::<W>().await?;

        APP_CONTEXT
            .set(RwLock::new(ctx))
            .map_err(|_| WedError::from("WedAppContext is already initialized"))?;
        Ok(())
    }

    async fn init_db_manager<D: DbManager + 'static>(&mut self) -> WedResult<()> {
        self.db_manager = Some(D::init(self.settings()?).await?);
        info!("Database initialized successfully.");
        Ok(())
    }

    async fn init_cache_provider<P: CacheProvider + 'static>(&mut self) -> WedResult<()> {
        self.cache_provider = Some(P::init(self.settings()?).await?);
        info!("Cache provider initialized successfully.");
        Ok(())
    }

    async fn init_web_server<W: WebServer + 'static>(&mut self) -> WedResult<()> {
        self.web_server = Some(
            W::init(
                self.settings()?,
                self.db_manager()?,
                self.cache_provider()?,
            )
            .await?,
        );
        info!("Web server initialized successfully.");
        Ok(())
    }

    #[inline]
    pub fn settings(&self) -> WedResult<&Settings> {
        self.settings
            .as_ref()
            .ok_or(WedError::from("Settings not initialized"))
    }

    #[inline]
    pub fn db_manager(&self) -> WedResult<Arc<dyn DbManager>> {
        self.db_manager
            .as_ref()
            .ok_or(WedError::from("Database manager not initialized"))
            .map(Arc::clone)
    }

    #[inline]
    pub fn cache_provider(&self) -> WedResult<Arc<dyn CacheProvider>> {
        self.cache_provider
            .as_ref()
            .ok_or(WedError::from("Cache provider not initialized"))
            .map(Arc::clone)
    }

    #[inline]
    pub fn web_server(&self) -> WedResult<Arc<dyn WebServer>> {
        self.web_server
            .as_ref()
            .ok_or(WedError::from("Web server not initialized"))
            .map(Arc::clone)
    }

    pub fn log_level(&self) -> LevelFilter {
        self.logger.level()
    }

    pub fn change_log_level(&self, level: Level) -> WedResult<()> {
        self.logger.set_level(level)?;
        info!(%level, "Log level changed");
        Ok(())
    }

    /// Serves until a shutdown signal arrives, then shuts down gracefully.
    pub async fn run(&self) -> WedResult<()> {
        self.listen_for_shutdown(async { self.graceful_shutdown().await })
            .await
    }

    async fn listen_for_shutdown<F>(&self, shutdown_fn: F) -> WedResult<()>
    where
        F: Future<Output = WedResult<()>>,
    {
        #[cfg(unix)]
        {
            let mut sigterm = signal(SignalKind::terminate())?;
            let mut sigint = signal(SignalKind::interrupt())?;
            let mut sighup = signal(SignalKind::hangup())?;
            let mut sigquit = signal(SignalKind::quit())?;

            tokio::select! {
                _ = sigterm.recv() => info!("Received SIGTERM signal"),
                _ = sigint.recv() => info!("Received SIGINT signal"),
                _ = sighup.recv() => info!("Received SIGHUP signal"),
                _ = sigquit.recv() => info!("Received SIGQUIT signal"),
            }
        }

        #[cfg(windows)]
        {
            ctrl_c().await?;
            info!("Received ctrl-c signal");
        }

        shutdown_fn.await
    }

    /// Stops the web server first so no request touches a closed pool.
    #[instrument(name = "graceful-shutdown", skip_all)]
    pub async fn graceful_shutdown(&self) -> WedResult<()> {
        if self.shutting_down.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        info!("Starting graceful shutdown...");

        if let Some(web_server) = &self.web_server {
            if let Err(e) = web_server.stop().await {
                tracing::warn!(error = %e, "Web server did not stop cleanly");
            }
        }

        let tracker = TaskTracker::new();
        if let Some(db_manager) = &self.db_manager {
            let db_manager = Arc::clone(db_manager);
            tracker.spawn(async move {
                if let Err(e) = db_manager.close().await {
                    tracing::warn!(error = %e, "Database did not close cleanly");
                }
            });
        }
        tracker.close();
        tracker.wait().await;

        info!("Graceful shutdown completed");
        Ok(())
    }
}

/// Switches the working directory so every relative path lands under `runtime_dir`.
fn apply_runtime_dir(runtime_dir: &str) -> WedResult<()> {
    let dir = runtime_dir.trim();
    if dir.is_empty() || dir == "." {
        return Ok(());
    }

    std::fs::create_dir_all(dir)
        .map_err(|e| WedError::from(format!("Failed to create runtime_dir {dir}: {e}")))?;
    std::env::set_current_dir(dir)
        .map_err(|e| WedError::from(format!("Failed to enter runtime_dir {dir}: {e}")))?;
    Ok(())
}

/// Creates the data, log and media directories under `base`. An absolute
/// media root is used as is.
fn ensure_runtime_directories(base: &Path, settings: &Settings) -> WedResult<()> {
    for dir in [DATA_DIR, LOG_DIR, settings.media.root_dir.as_str()] {
        let dir = base.join(dir);
        std::fs::create_dir_all(&dir).map_err(|e| {
            WedError::from(format!("Failed to create directory {}: {e}", dir.display()))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wedding_models::{
        constants::MEDIA_DIR,
        settings::{Inner, Media},
    };

    #[test]
    fn test_ensure_runtime_directories() {
        let base = tempfile::tempdir().unwrap();
        let uploads = tempfile::tempdir().unwrap();
        let settings = Settings::from_inner(Inner {
            media: Media {
                root_dir: uploads.path().join("gallery").to_string_lossy().to_string(),
                ..Default::default()
            },
            ..Default::default()
        });
        ensure_runtime_directories(base.path(), &settings).unwrap();
        assert!(base.path().join(DATA_DIR).is_dir());
        assert!(base.path().join(LOG_DIR).is_dir());
        assert!(uploads.path().join("gallery").is_dir());

        // relative media roots land under the base
        ensure_runtime_directories(base.path(), &Settings::default()).unwrap();
        assert!(base.path().join(MEDIA_DIR).is_dir());
    }

    #[test]
    fn test_logger_level_before_init() {
        let logger = Logger::new(Some(Level::WARN));
        assert_eq!(logger.level(), LevelFilter::WARN);
        assert!(logger.set_level(Level::DEBUG).is_err());
    }
}
