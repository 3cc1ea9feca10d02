use tracing::{subscriber::set_global_default, Level};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    filter::LevelFilter,
    fmt,
    layer::SubscriberExt,
    reload::{self, Handle},
    Layer, Registry,
};
use wedding_error::{WedError, WedResult};
use wedding_models::constants::LOG_DIR;

const LOG_FILE_NAME: &str = "wedding.log";

/// Console plus daily-rolling file output behind one level filter that can be
/// swapped while the process runs.
pub struct Logger {
    default_level: Level,
    handle: Option<Handle<LevelFilter, Registry>>,
    _file_guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn new(level: Option<Level>) -> Self {
        Logger {
            default_level: level.unwrap_or(Level::INFO),
            handle: None,
            _file_guard: None,
        }
    }

    pub fn level(&self) -> LevelFilter {
        self.handle
            .as_ref()
            .and_then(Handle::clone_current)
            .unwrap_or(LevelFilter::from_level(self.default_level))
    }

    /// Changes the level of both layers at once.
    pub fn set_level(&self, level: Level) -> WedResult<()> {
        let handle = self
            .handle
            .as_ref()
            .ok_or(WedError::from("Logger not initialized"))?;
        handle
            .modify(|filter| *filter = LevelFilter::from_level(level))
            .map_err(|e| WedError::from(format!("Failed to change log level: {e}")))
    }

    pub fn initialize(&mut self) -> WedResult<()> {
        let (non_blocking, guard) =
            tracing_appender::non_blocking(rolling::daily(LOG_DIR, LOG_FILE_NAME));
        self._file_guard = Some(guard);

        let (filter, handle) = reload::Layer::new(LevelFilter::from_level(self.default_level));

        let debug = cfg!(debug_assertions);
        let console_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_file(debug)
            .with_line_number(debug)
            .boxed();
        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_file(debug)
            .with_line_number(debug)
            .boxed();

        let subscriber = Registry::default()
            .with(filter)
            .with(console_layer)
            .with(file_layer);

        set_global_default(subscriber).map_err(|_| WedError::from("Failed to set logger"))?;
        self.handle = Some(handle);
        Ok(())
    }
}
