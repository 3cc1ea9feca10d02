use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use wedding_error::StorageResult;
use wedding_models::entities::prelude::{AdminUser, AdminUserColumn, AdminUserModel};

pub struct AdminUserRepository;

impl AdminUserRepository {
    pub async fn find_by_id<C: ConnectionTrait>(
        id: i32,
        db: &C,
    ) -> StorageResult<Option<AdminUserModel>> {
        Ok(AdminUser::find_by_id(id).one(db).await?)
    }

    pub async fn find_by_username<C: ConnectionTrait>(
        username: &str,
        db: &C,
    ) -> StorageResult<Option<AdminUserModel>> {
        Ok(AdminUser::find()
            .filter(AdminUserColumn::Username.eq(username.trim()))
            .one(db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wedding_models::constants::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};
    use wedding_storage::connect_in_memory;
    use wedding_utils::hash::bcrypt_check;

    #[tokio::test]
    async fn test_seeded_admin() {
        let db = connect_in_memory().await.unwrap();
        let admin = AdminUserRepository::find_by_username(DEFAULT_ADMIN_USERNAME, &db)
            .await
            .unwrap()
            .unwrap();
        assert!(bcrypt_check(DEFAULT_ADMIN_PASSWORD, &admin.password));
        assert_eq!(
            AdminUserRepository::find_by_id(admin.id, &db)
                .await
                .unwrap()
                .map(|u| u.username),
            Some(DEFAULT_ADMIN_USERNAME.to_string())
        );
        assert!(AdminUserRepository::find_by_username("nobody", &db)
            .await
            .unwrap()
            .is_none());
    }
}
