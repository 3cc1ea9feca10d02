use crate::idens;
use async_trait::async_trait;
use sea_orm::{
    sea_query::{IndexCreateStatement, TableCreateStatement, TableDropStatement},
    ActiveModelTrait, DatabaseBackend, DatabaseTransaction, DbErr, EntityTrait,
};
use std::{any::Any, collections::HashMap};
use wedding_error::{init::InitContextError, WedError, WedResult};

/// One table of the schema: how to create it, index it and fill it.
#[async_trait]
pub trait WedInitializer: Send + Sync {
    fn order(&self) -> i32;

    fn name(&self) -> &str;

    /// Whether the table carries an `updated_at` column maintained by trigger
    fn has_update_col(&self) -> bool;

    fn to_create_table_stmt(&self, backend: DatabaseBackend) -> TableCreateStatement;

    fn to_drop_table_stmt(&self, backend: DatabaseBackend) -> TableDropStatement;

    fn to_create_indexes_stmt(&self, backend: DatabaseBackend)
        -> Option<Vec<IndexCreateStatement>>;

    async fn seeding_data(
        &self,
        transaction: &DatabaseTransaction,
        ctx: &mut InitContext,
    ) -> Result<(), DbErr>;
}

/// Trait for types that can be seeded into the database
pub trait SeedableTrait: Send + Sync + 'static {
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity>;
    type Entity: EntityTrait;

    fn get_active_model(&self) -> Self::ActiveModel;
}

#[async_trait]
pub trait DataSeederTrait<T: SeedableTrait + Clone> {
    /// Rows to insert on first migration, `None` when the table starts empty
    async fn get_seed_data(&self, ctx: &mut InitContext) -> Result<Option<Vec<T>>, DbErr>;
}

#[async_trait]
pub trait SeedableInitializerTrait<T: SeedableTrait + Clone>:
    WedInitializer + DataSeederTrait<T>
{
    async fn seed_data(
        &self,
        transaction: &DatabaseTransaction,
        ctx: &mut InitContext,
    ) -> Result<(), DbErr> {
        if let Some(seed_data) = self.get_seed_data(ctx).await? {
            if seed_data.is_empty() {
                return Ok(());
            }

            let active_models: Vec<T::ActiveModel> =
                seed_data.iter().map(|d| d.get_active_model()).collect();

            T::Entity::insert_many(active_models)
                .exec(transaction)
                .await?;

            ctx.set(self.name(), seed_data);
        }
        Ok(())
    }
}

/// Every table initializer, sorted by creation order.
pub fn initializers() -> Vec<Box<dyn WedInitializer>> {
    let mut initializers: Vec<Box<dyn WedInitializer>> = vec![
        Box::new(idens::admin_user::AdminUser::Table),
        Box::new(idens::invitation::Invitation::Table),
        Box::new(idens::simple_guest::SimpleGuest::Table),
        Box::new(idens::media_item::MediaItem::Table),
        Box::new(idens::timeline_event::TimelineEvent::Table),
        Box::new(idens::cms_document::CmsDocument::Table),
    ];

    initializers.sort_by_key(|init| init.order());
    initializers
}

/// Carries seeded rows from one initializer to the ones that run after it.
pub struct InitContext {
    data: HashMap<String, Vec<Box<dyn Any + Send + Sync>>>,
}

impl InitContext {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn set<T: 'static + Send + Sync>(&mut self, key: &str, values: Vec<T>) {
        let boxed_values: Vec<Box<dyn Any + Send + Sync>> = values
            .into_iter()
            .map(|v| Box::new(v) as Box<dyn Any + Send + Sync>)
            .collect();
        self.data.insert(key.into(), boxed_values);
    }

    /// Rows stored under `key`, failing when the key is absent or holds another type.
    pub fn get<T: 'static>(&self, key: &str) -> WedResult<Vec<&T>> {
        let values =
            self.data
                .get(key)
                .ok_or(WedError::InitContextError(InitContextError::KeyNotFound(
                    key.into(),
                )))?;

        values
            .iter()
            .map(|value| {
                value.downcast_ref::<T>().ok_or(WedError::InitContextError(
                    InitContextError::TypeMismatch(key.into()),
                ))
            })
            .collect()
    }
}

impl Default for InitContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initializers_sorted_and_named_after_tables() {
        let inits = initializers();
        let names: Vec<_> = inits.iter().map(|i| i.name().to_string()).collect();
        assert_eq!(
            names,
            vec![
                "admin_users",
                "invitations",
                "simple_guests",
                "media_items",
                "timeline_events",
                "cms_documents"
            ]
        );
        assert!(inits.windows(2).all(|w| w[0].order() <= w[1].order()));
        assert!(inits.iter().all(|i| i.has_update_col()));
    }

    #[test]
    fn test_init_context() {
        let mut ctx = InitContext::new();
        ctx.set("numbers", vec![1_i32, 2, 3]);
        assert_eq!(ctx.get::<i32>("numbers").unwrap(), vec![&1, &2, &3]);
        assert!(matches!(
            ctx.get::<String>("numbers"),
            Err(WedError::InitContextError(InitContextError::TypeMismatch(_)))
        ));
        assert!(matches!(
            ctx.get::<i32>("missing"),
            Err(WedError::InitContextError(InitContextError::KeyNotFound(_)))
        ));
    }
}
