use crate::validation::{EntityType, EntityValidator, Operation, WedEntity};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::instrument;
use wedding_error::{web::WebError, WebResult};
use wedding_models::domain::prelude::{NewGuest, UpdateGuest};
use wedding_repository::InvitationRepository;
use wedding_utils::code::normalize_code;

/// Guests may only be linked to invitation codes that exist.
pub struct InvitationReferenceValidator;

#[async_trait]
impl EntityValidator for InvitationReferenceValidator {
    #[inline]
    fn supported_entity_types(&self) -> Vec<EntityType> {
        vec![EntityType::Guest]
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
        let link = match operation {
            Operation::Create => entity
                .downcast_ref::<NewGuest>()
                .map(|g| g.invitation_code.as_deref()),
            Operation::Write => entity
                .downcast_ref::<UpdateGuest>()
                .map(|g| g.invitation_code.as_deref()),
        }
        .ok_or_else(|| WebError::InternalError("unexpected payload for guest validation".into()))?;

        let Some(code) = link.map(normalize_code).filter(|c| !c.is_empty()) else {
            return Ok(());
        };
        if InvitationRepository::find_by_code(&code, db).await?.is_none() {
            return Err(WebError::BadRequest(format!("no invitation with code {code}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wedding_models::{
        domain::prelude::NewInvitation,
        enums::common::{Attendance, Relationship},
    };
    use wedding_storage::connect_in_memory;

    fn guest(code: Option<&str>) -> NewGuest {
        NewGuest {
            name: "Bob".into(),
            email: None,
            phone: None,
            attendance: Attendance::Pending,
            plus_ones: 0,
            notes: None,
            invitation_code: code.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_link_must_exist() {
        let db = connect_in_memory().await.unwrap();
        InvitationRepository::create(
            NewInvitation {
                code: Some("FAM001".into()),
                guest_name: "The Smiths".into(),
                partner_name: None,
                email: None,
                phone: None,
                relationship: Relationship::Family,
                party_size: 4,
                table_number: None,
                message: None,
            },
            6,
            &db,
        )
        .await
        .unwrap();

        for ok in [guest(Some("fam001")), guest(None), guest(Some(" "))] {
            InvitationReferenceValidator
                .validate(&ok, Operation::Create, &db)
                .await
                .unwrap();
        }
        let dangling = InvitationReferenceValidator
            .validate(&guest(Some("NOPE99")), Operation::Create, &db)
            .await;
        assert!(matches!(dangling, Err(WebError::BadRequest(_))));
    }
}
