pub mod manager;
pub mod prelude;
pub mod validators;

use async_trait::async_trait;
use downcast_rs::{impl_downcast, DowncastSync};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use wedding_error::WebResult;
use wedding_models::domain::prelude::{NewGuest, NewInvitation, UpdateGuest, UpdateInvitation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Invitation,
    Guest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Write,
}

/// A payload the validators can inspect and downcast.
pub trait WedEntity: DowncastSync {
    fn entity_type(&self) -> EntityType;
}
impl_downcast!(sync WedEntity);

impl WedEntity for NewInvitation {
    fn entity_type(&self) -> EntityType {
        EntityType::Invitation
    }
}

impl WedEntity for UpdateInvitation {
    fn entity_type(&self) -> EntityType {
        EntityType::Invitation
    }
}

impl WedEntity for NewGuest {
    fn entity_type(&self) -> EntityType {
        EntityType::Guest
    }
}

impl WedEntity for UpdateGuest {
    fn entity_type(&self) -> EntityType {
        EntityType::Guest
    }
}

/// Core trait for entity validators
#[async_trait]
pub trait EntityValidator: Send + Sync {
    /// Returns entity types supported by this validator
    fn supported_entity_types(&self) -> Vec<EntityType>;

    /// Returns operations supported by this validator
    fn supported_operations(&self) -> Vec<Operation>;

    /// Checks `entity` against the stored data before `operation` runs.
    async fn validate(
        &self,
        entity: &dyn WedEntity,
        operation: Operation,
        db: &DatabaseConnection,
    ) -> WebResult<()>;

    fn is_applicable(&self, entity_type: &EntityType, operation: &Operation) -> bool {
        self.supported_entity_types().contains(entity_type)
            && self.supported_operations().contains(operation)
    }
}
