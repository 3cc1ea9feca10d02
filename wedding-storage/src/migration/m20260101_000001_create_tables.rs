use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseBackend, Statement, TransactionTrait};
use tracing::{info, instrument};
use wedding_models::initializer::{initializers, InitContext};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        create_tables(manager).await?;
        create_indexes(manager).await?;
        create_updated_at_triggers(manager).await?;
        seed(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        // reverse creation order
        for initializer in initializers().iter().rev() {
            manager
                .drop_table(initializer.to_drop_table_stmt(backend))
                .await?;
        }
        Ok(())
    }
}

async fn create_tables(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let backend = manager.get_database_backend();
    for initializer in initializers() {
        manager
            .create_table(initializer.to_create_table_stmt(backend))
            .await?;
    }
    Ok(())
}

async fn create_indexes(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let backend = manager.get_database_backend();
    for initializer in initializers() {
        for stmt in initializer
            .to_create_indexes_stmt(backend)
            .unwrap_or_default()
        {
            manager.create_index(stmt).await?;
        }
    }
    Ok(())
}

/// SQLite has no `ON UPDATE CURRENT_TIMESTAMP`, so every table with an
/// `updated_at` column gets an `AFTER UPDATE` trigger. The `WHEN` clause
/// leaves explicit writes alone and stops the trigger from re-firing itself.
async fn create_updated_at_triggers(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    if manager.get_database_backend() != DatabaseBackend::Sqlite {
        return Ok(());
    }

    let conn = manager.get_connection();
    for initializer in initializers()
        .into_iter()
        .filter(|init| init.has_update_col())
    {
        let table = initializer.name();
        let sql = format!(
            r#"
            CREATE TRIGGER IF NOT EXISTS "trg_{table}_updated_at"
            AFTER UPDATE ON "{table}"
            FOR EACH ROW
            WHEN NEW."updated_at" = OLD."updated_at"
            BEGIN
                UPDATE "{table}" SET "updated_at" = CURRENT_TIMESTAMP WHERE rowid = NEW.rowid;
            END;
            "#
        );
        conn.execute(Statement::from_string(DatabaseBackend::Sqlite, sql))
            .await?;
    }
    Ok(())
}

#[instrument(name = "seed-tables", skip_all)]
async fn seed(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let db = manager.get_connection();
    let mut ctx = InitContext::default();
    for initializer in initializers() {
        let txn = db.begin().await?;
        initializer.seeding_data(&txn, &mut ctx).await?;
        txn.commit().await?;
        info!(table = initializer.name(), "seeded");
    }
    Ok(())
}
