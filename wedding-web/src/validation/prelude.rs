use super::{
    manager::ValidationManager,
    validators::{duplicate::EntityDuplicateValidator, reference::InvitationReferenceValidator},
};
use std::sync::Arc;

/// Validation manager with every built-in validator registered.
pub fn create_default_manager() -> ValidationManager {
    let mut manager = ValidationManager::new();
    manager
        .register(Arc::new(EntityDuplicateValidator))
        .register(Arc::new(InvitationReferenceValidator));
    manager
}
