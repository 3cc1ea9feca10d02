use crate::migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::{info, instrument, log::LevelFilter};
use wedding_error::WedResult;
use wedding_models::settings::{Sqlite, WedDbConfig};

/// Opens the SQLite pool described by `config`.
///
/// With `auto_create` the URL carries `mode=rwc` so the file is created on first start.
#[instrument(name = "init-sqlite-db", skip_all)]
pub async fn init_db(config: &Sqlite) -> WedResult<DatabaseConnection> {
    let mut opts = ConnectOptions::new(config.to_url());
    opts.connect_timeout(Duration::from_millis(config.timeout))
        .idle_timeout(Duration::from_millis(config.idle_timeout))
        .max_lifetime(Duration::from_millis(config.max_lifetime))
        .max_connections(config.max_connections);

    #[cfg(debug_assertions)]
    {
        opts.sqlx_logging(true)
            .sqlx_logging_level(LevelFilter::Debug);
    }
    #[cfg(not(debug_assertions))]
    {
        opts.sqlx_logging(false)
            .sqlx_logging_level(LevelFilter::Off);
    }

    info!(
        path = %config.db_path(),
        auto_create = config.auto_create,
        "Connecting to SQLite database"
    );

    let db = Database::connect(opts).await?;

    #[cfg(not(debug_assertions))]
    {
        use sea_orm::{ConnectionTrait, DbBackend, Statement};
        for pragma in [
            "PRAGMA synchronous=NORMAL;",
            "PRAGMA temp_store=MEMORY;",
            "PRAGMA foreign_keys=ON;",
        ] {
            let _ = db
                .execute(Statement::from_string(DbBackend::Sqlite, pragma))
                .await;
        }
    }

    info!("Successfully connected to SQLite database");
    Ok(db)
}

/// Private in-memory database with the full schema and seed data applied.
///
/// Limited to one connection: every pooled connection to `sqlite::memory:`
/// would otherwise open a database of its own.
pub async fn connect_in_memory() -> WedResult<DatabaseConnection> {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opts).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}
