use crate::initializer::{InitContext, WedInitializer};
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};
use wedding_macros::UnseedableInitializer;

#[derive(DeriveIden, UnseedableInitializer)]
#[unseedable(meta(
    name = "invitations",
    order = super::INIT_INVITATION_ORDER,
    create_table = create_invitation_table,
    create_indexes = create_invitation_indexes
))]
pub enum Invitation {
    #[sea_orm(iden = "invitations")]
    Table,
    Id,
    Code,
    GuestName,
    PartnerName,
    Email,
    Phone,
    Relationship,
    PartySize,
    Attendance,
    ConfirmedPartySize,
    RsvpCompleted,
    GiftCompleted,
    PhotoCompleted,
    OpenCount,
    FirstOpenedAt,
    LastOpenedAt,
    Message,
    DietaryNotes,
    TableNumber,
    SelfRegistered,
    RespondedAt,
    CreatedAt,
    UpdatedAt,
}

fn flag(col: Invitation) -> ColumnDef {
    ColumnDef::new(col)
        .boolean()
        .not_null()
        .default(false)
        .to_owned()
}

fn create_invitation_table(_backend: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(Invitation::Table)
        .if_not_exists()
        .col(pk_auto(Invitation::Id))
        .col(
            ColumnDef::new(Invitation::Code)
                .string_len(32)
                .not_null()
                .comment("personal link token"),
        )
        .col(
            ColumnDef::new(Invitation::GuestName)
                .string_len(128)
                .not_null(),
        )
        .col(ColumnDef::new(Invitation::PartnerName).string_len(128))
        .col(ColumnDef::new(Invitation::Email).string_len(255))
        .col(ColumnDef::new(Invitation::Phone).string_len(64))
        .col(
            ColumnDef::new(Invitation::Relationship)
                .string_len(16)
                .not_null()
                .default("other")
                .comment("family | friend | colleague | other"),
        )
        .col(
            ColumnDef::new(Invitation::PartySize)
                .integer()
                .not_null()
                .default(1)
                .comment("seats offered"),
        )
        .col(
            ColumnDef::new(Invitation::Attendance)
                .string_len(16)
                .not_null()
                .default("pending")
                .comment("yes | no | pending"),
        )
        .col(ColumnDef::new(Invitation::ConfirmedPartySize).integer())
        .col(flag(Invitation::RsvpCompleted))
        .col(flag(Invitation::GiftCompleted))
        .col(flag(Invitation::PhotoCompleted))
        .col(
            ColumnDef::new(Invitation::OpenCount)
                .integer()
                .not_null()
                .default(0),
        )
        .col(ColumnDef::new(Invitation::FirstOpenedAt).timestamp())
        .col(ColumnDef::new(Invitation::LastOpenedAt).timestamp())
        .col(ColumnDef::new(Invitation::Message).text())
        .col(ColumnDef::new(Invitation::DietaryNotes).text())
        .col(ColumnDef::new(Invitation::TableNumber).integer())
        .col(flag(Invitation::SelfRegistered))
        .col(ColumnDef::new(Invitation::RespondedAt).timestamp())
        .col(
            ColumnDef::new(Invitation::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Invitation::UpdatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

fn create_invitation_indexes(_: DatabaseBackend) -> Option<Vec<IndexCreateStatement>> {
    Some(vec![
        Index::create()
            .name("ux_invitations_code")
            .table(Invitation::Table)
            .col(Invitation::Code)
            .unique()
            .to_owned(),
        Index::create()
            .name("idx_invitations_attendance")
            .table(Invitation::Table)
            .col(Invitation::Attendance)
            .to_owned(),
    ])
}
