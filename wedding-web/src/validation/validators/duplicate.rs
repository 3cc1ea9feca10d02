use crate::validation::{EntityType, EntityValidator, Operation, WedEntity};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::instrument;
use wedding_error::{web::WebError, WebResult};
use wedding_models::domain::prelude::{NewInvitation, UpdateInvitation};
use wedding_repository::InvitationRepository;
use wedding_utils::code::normalize_code;

/// Rejects invitation codes another invitation already uses.
pub struct EntityDuplicateValidator;

#[async_trait]
impl EntityValidator for EntityDuplicateValidator {
    #[inline]
    fn supported_entity_types(&self) -> Vec<EntityType> {
        vec![EntityType::Invitation]
    }

    #[inline]
    fn supported_operations(&self) -> Vec<Operation> {
        vec![Operation::Create, Operation::Write]
    }

    #[instrument(skip(self, entity, db))]
    async fn validate(
        &self,
        entity: &dyn WedEntity,
        operation: Operation,
        db: &DatabaseConnection,
    ) -> WebResult<()> {
        let (code, exclude_id) = match operation {
            Operation::Create => {
                let new = downcast::<NewInvitation>(entity)?;
                match new.code.as_deref() {
                    Some(code) => (code, None),
                    // generated codes are unique by construction
                    None => return Ok(()),
                }
            }
            Operation::Write => {
                let update = downcast::<UpdateInvitation>(entity)?;
                (update.code.as_str(), Some(update.id))
            }
        };
        let code = normalize_code(code);
        if code.is_empty() {
            return Ok(());
        }
        if InvitationRepository::exists_by_code(&code, exclude_id, db).await? {
            return Err(WebError::BadRequest(format!(
                "invitation code {code} is already in use"
            )));
        }
        Ok(())
    }
}

fn downcast<T: WedEntity>(entity: &dyn WedEntity) -> WebResult<&T> {
    entity.downcast_ref::<T>().ok_or_else(|| {
        WebError::InternalError(format!(
            "unexpected payload for {:?} validation",
            entity.entity_type()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wedding_models::enums::common::{Attendance, Relationship};
    use wedding_storage::connect_in_memory;

    fn new_invitation(code: Option<&str>) -> NewInvitation {
        NewInvitation {
            code: code.map(str::to_string),
            guest_name: "Ada".into(),
            partner_name: None,
            email: None,
            phone: None,
            relationship: Relationship::Friend,
            party_size: 2,
            table_number: None,
            message: None,
        }
    }

    #[tokio::test]
    async fn test_rejects_taken_code_ignoring_case() {
        let db = connect_in_memory().await.unwrap();
        InvitationRepository::create(new_invitation(Some("LOVE24")), 6, &db)
            .await
            .unwrap();

        let taken = EntityDuplicateValidator
            .validate(&new_invitation(Some(" love24 ")), Operation::Create, &db)
            .await;
        assert!(matches!(taken, Err(WebError::BadRequest(_))));

        EntityDuplicateValidator
            .validate(&new_invitation(None), Operation::Create, &db)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_may_keep_its_own_code() {
        let db = connect_in_memory().await.unwrap();
        let first = InvitationRepository::create(new_invitation(Some("LOVE24")), 6, &db)
            .await
            .unwrap();
        let second = InvitationRepository::create(new_invitation(Some("OTHER1")), 6, &db)
            .await
            .unwrap();

        let update = |id: i32, code: &str| UpdateInvitation {
            id,
            code: code.into(),
            guest_name: "Ada".into(),
            partner_name: None,
            email: None,
            phone: None,
            relationship: Relationship::Friend,
            party_size: 2,
            attendance: Attendance::Pending,
            confirmed_party_size: None,
            table_number: None,
            message: None,
            dietary_notes: None,
            rsvp_completed: false,
            gift_completed: false,
            photo_completed: false,
        };

        EntityDuplicateValidator
            .validate(&update(first.id, "LOVE24"), Operation::Write, &db)
            .await
            .unwrap();
        let clash = EntityDuplicateValidator
            .validate(&update(second.id, "love24"), Operation::Write, &db)
            .await;
        assert!(matches!(clash, Err(WebError::BadRequest(_))));
    }
}
