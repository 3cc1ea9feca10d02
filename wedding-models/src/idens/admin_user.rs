use crate::{
    constants::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME},
    domain::prelude::NewAdminUserWithId,
    initializer::{
        DataSeederTrait, InitContext, SeedableInitializerTrait, SeedableTrait, WedInitializer,
    },
};
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};
use wedding_macros::SeedableInitializer;
use wedding_utils::hash;

#[derive(DeriveIden, SeedableInitializer)]
#[seedable(meta(
    name = "admin_users",
    model = NewAdminUserWithId,
    order = super::INIT_ADMIN_USER_ORDER,
    create_table = create_admin_user_table,
    create_indexes = create_admin_user_indexes,
    seed_data = get_admin_user_seed_data
))]
pub enum AdminUser {
    #[sea_orm(iden = "admin_users")]
    Table,
    Id,
    Username,
    Password,
    DisplayName,
    CreatedAt,
    UpdatedAt,
}

fn create_admin_user_table(_backend: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(AdminUser::Table)
        .if_not_exists()
        .col(pk_auto(AdminUser::Id))
        .col(
            ColumnDef::new(AdminUser::Username)
                .string_len(64)
                .not_null()
                .comment("login name"),
        )
        .col(
            ColumnDef::new(AdminUser::Password)
                .string_len(255)
                .not_null()
                .comment("bcrypt hash"),
        )
        .col(
            ColumnDef::new(AdminUser::DisplayName)
                .string_len(128)
                .not_null(),
        )
        .col(
            ColumnDef::new(AdminUser::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(AdminUser::UpdatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

fn create_admin_user_indexes(_: DatabaseBackend) -> Option<Vec<IndexCreateStatement>> {
    Some(vec![Index::create()
        .name("ux_admin_users_username")
        .table(AdminUser::Table)
        .col(AdminUser::Username)
        .unique()
        .to_owned()])
}

async fn get_admin_user_seed_data(
    _: &mut InitContext,
) -> Result<Option<Vec<NewAdminUserWithId>>, DbErr> {
    let password =
        hash::bcrypt_hash(DEFAULT_ADMIN_PASSWORD).map_err(|e| DbErr::Custom(e.to_string()))?;
    Ok(Some(vec![NewAdminUserWithId {
        id: 1,
        username: DEFAULT_ADMIN_USERNAME.into(),
        password,
        display_name: "Administrator".into(),
    }]))
}
