use crate::{
    entities::admin_user::{ActiveModel, Entity as AdminUserEntity},
    initializer::SeedableTrait,
};
use sea_orm::{DeriveIntoActiveModel, IntoActiveModel};

/// Administrator row inserted when the database is first created
#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel)]
pub struct NewAdminUserWithId {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub display_name: String,
}

impl SeedableTrait for NewAdminUserWithId {
    type ActiveModel = ActiveModel;
    type Entity = AdminUserEntity;

    fn get_active_model(&self) -> Self::ActiveModel {
        self.clone().into_active_model()
    }
}
