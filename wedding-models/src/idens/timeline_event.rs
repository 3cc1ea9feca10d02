use crate::initializer::{InitContext, WedInitializer};
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};
use wedding_macros::UnseedableInitializer;

#[derive(DeriveIden, UnseedableInitializer)]
#[unseedable(meta(
    name = "timeline_events",
    order = super::INIT_TIMELINE_EVENT_ORDER,
    create_table = create_timeline_event_table
))]
pub enum TimelineEvent {
    #[sea_orm(iden = "timeline_events")]
    Table,
    Id,
    Title,
    Description,
    OccurredAt,
    Location,
    ImageUrl,
    Visible,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}

fn create_timeline_event_table(_backend: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(TimelineEvent::Table)
        .if_not_exists()
        .col(pk_auto(TimelineEvent::Id))
        .col(
            ColumnDef::new(TimelineEvent::Title)
                .string_len(255)
                .not_null(),
        )
        .col(ColumnDef::new(TimelineEvent::Description).text())
        .col(
            ColumnDef::new(TimelineEvent::OccurredAt)
                .timestamp()
                .not_null(),
        )
        .col(ColumnDef::new(TimelineEvent::Location).string_len(255))
        .col(ColumnDef::new(TimelineEvent::ImageUrl).string_len(512))
        .col(
            ColumnDef::new(TimelineEvent::Visible)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(TimelineEvent::SortOrder)
                .integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(TimelineEvent::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(TimelineEvent::UpdatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}
