use crate::initializer::{InitContext, WedInitializer};
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};
use wedding_macros::UnseedableInitializer;

#[derive(DeriveIden, UnseedableInitializer)]
#[unseedable(meta(
    name = "simple_guests",
    order = super::INIT_SIMPLE_GUEST_ORDER,
    create_table = create_simple_guest_table,
    create_indexes = create_simple_guest_indexes
))]
pub enum SimpleGuest {
    #[sea_orm(iden = "simple_guests")]
    Table,
    Id,
    Name,
    Email,
    Phone,
    Attendance,
    PlusOnes,
    Notes,
    InvitationCode,
    CreatedAt,
    UpdatedAt,
}

fn create_simple_guest_table(_backend: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(SimpleGuest::Table)
        .if_not_exists()
        .col(pk_auto(SimpleGuest::Id))
        .col(ColumnDef::new(SimpleGuest::Name).string_len(128).not_null())
        .col(ColumnDef::new(SimpleGuest::Email).string_len(255))
        .col(ColumnDef::new(SimpleGuest::Phone).string_len(64))
        .col(
            ColumnDef::new(SimpleGuest::Attendance)
                .string_len(16)
                .not_null()
                .default("pending"),
        )
        .col(
            ColumnDef::new(SimpleGuest::PlusOnes)
                .integer()
                .not_null()
                .default(0),
        )
        .col(ColumnDef::new(SimpleGuest::Notes).text())
        .col(
            ColumnDef::new(SimpleGuest::InvitationCode)
                .string_len(32)
                .comment("code of the linked invitation"),
        )
        .col(
            ColumnDef::new(SimpleGuest::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(SimpleGuest::UpdatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

fn create_simple_guest_indexes(_: DatabaseBackend) -> Option<Vec<IndexCreateStatement>> {
    Some(vec![Index::create()
        .name("idx_simple_guests_invitation_code")
        .table(SimpleGuest::Table)
        .col(SimpleGuest::InvitationCode)
        .to_owned()])
}
