use super::*;
use tracing::{debug, instrument};

/// Runs every registered validator that applies to an entity and operation.
#[derive(Default)]
pub struct ValidationManager {
    validators: Vec<Arc<dyn EntityValidator>>,
}

impl ValidationManager {
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    /// Registers a validator, returning `self` for chaining.
    pub fn register(&mut self, validator: Arc<dyn EntityValidator>) -> &mut Self {
        self.validators.push(validator);
        self
    }

    /// Stops at the first validator that fails.
    #[instrument(skip(self, entity, db))]
    pub async fn validate(
        &self,
        entity: &dyn WedEntity,
        operation: Operation,
        db: &DatabaseConnection,
    ) -> WebResult<()> {
        let entity_type = entity.entity_type();
        debug!("Validating {:?} operation on {:?}", operation, entity_type);

        for validator in &self.validators {
            if validator.is_applicable(&entity_type, &operation) {
                validator.validate(entity, operation, db).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wedding_error::web::WebError;
    use wedding_models::enums::common::Attendance;
    use wedding_storage::connect_in_memory;

    struct Counting {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl EntityValidator for Counting {
        fn supported_entity_types(&self) -> Vec<EntityType> {
            vec![EntityType::Guest]
        }

        fn supported_operations(&self) -> Vec<Operation> {
            vec![Operation::Create]
        }

        async fn validate(
            &self,
            _entity: &dyn WedEntity,
            _operation: Operation,
            _db: &DatabaseConnection,
        ) -> WebResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(WebError::BadRequest("nope".into()));
            }
            Ok(())
        }
    }

    fn guest() -> NewGuest {
        NewGuest {
            name: "Ada".into(),
            email: None,
            phone: None,
            attendance: Attendance::Pending,
            plus_ones: 0,
            notes: None,
            invitation_code: None,
        }
    }

    #[tokio::test]
    async fn test_only_applicable_validators_run() {
        let db = connect_in_memory().await.unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut manager = ValidationManager::new();
        manager.register(Arc::new(Counting {
            calls: calls.clone(),
            fail: false,
        }));

        manager
            .validate(&guest(), Operation::Create, &db)
            .await
            .unwrap();
        manager
            .validate(&guest(), Operation::Write, &db)
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_stops_the_chain() {
        let db = connect_in_memory().await.unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut manager = ValidationManager::new();
        manager
            .register(Arc::new(Counting {
                calls: calls.clone(),
                fail: true,
            }))
            .register(Arc::new(Counting {
                calls: calls.clone(),
                fail: false,
            }));

        let result = manager.validate(&guest(), Operation::Create, &db).await;
        assert!(matches!(result, Err(WebError::BadRequest(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
