use clap::Parser;
use std::{env::current_dir, path::PathBuf};
use wedding_common::WedAppContext;
use wedding_error::{WedError, WedResult};
use wedding_models::constants::DEFAULT_CONFIG_FILE_NAME;
use wedding_storage::{WedCacheProvider, WedDbManager};
use wedding_web::WedWebServer;

/// Wedding site server
///
/// Serves the admin API, the guest-facing RSVP and gallery API, uploaded
/// media and, when enabled, the built frontend.
#[derive(Parser)]
#[command(name = "wedding")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Wedding site server", long_about = None)]
struct Cli {
    /// Path of the TOML config file
    ///
    /// Defaults to 'wedding.toml' in the current working directory. A missing
    /// file is fine: defaults and `WED__` environment variables still apply.
    #[arg(short, long, env = "WED_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> WedResult<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(p) => p,
        None => current_dir()
            .map_err(|e| WedError::from(format!("Failed to get current directory: {e}")))?
            .join(DEFAULT_CONFIG_FILE_NAME),
    };

    WedAppContext::init::<WedDbManager, WedCacheProvider, WedWebServer>(
        config_path.to_string_lossy().to_string(),
    )
    .await?;

    WedAppContext::instance().await?.run().await
}
