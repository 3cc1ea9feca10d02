use crate::initializer::{InitContext, WedInitializer};
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};
use wedding_macros::UnseedableInitializer;

#[derive(DeriveIden, UnseedableInitializer)]
#[unseedable(meta(
    name = "media_items",
    order = super::INIT_MEDIA_ITEM_ORDER,
    create_table = create_media_item_table,
    create_indexes = create_media_item_indexes
))]
pub enum MediaItem {
    #[sea_orm(iden = "media_items")]
    Table,
    Id,
    Title,
    Description,
    Category,
    Kind,
    FileName,
    OriginalName,
    Mime,
    SizeBytes,
    Featured,
    Visible,
    SortOrder,
    TakenAt,
    UploadedBy,
    CreatedAt,
    UpdatedAt,
}

fn create_media_item_table(_backend: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(MediaItem::Table)
        .if_not_exists()
        .col(pk_auto(MediaItem::Id))
        .col(ColumnDef::new(MediaItem::Title).string_len(255).not_null())
        .col(ColumnDef::new(MediaItem::Description).text())
        .col(
            ColumnDef::new(MediaItem::Category)
                .string_len(64)
                .not_null()
                .comment("gallery tab"),
        )
        .col(
            ColumnDef::new(MediaItem::Kind)
                .string_len(16)
                .not_null()
                .comment("image | video"),
        )
        .col(
            ColumnDef::new(MediaItem::FileName)
                .string_len(128)
                .not_null()
                .comment("stored file name under the media root"),
        )
        .col(
            ColumnDef::new(MediaItem::OriginalName)
                .string_len(255)
                .not_null(),
        )
        .col(ColumnDef::new(MediaItem::Mime).string_len(128).not_null())
        .col(
            ColumnDef::new(MediaItem::SizeBytes)
                .big_integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(MediaItem::Featured)
                .boolean()
                .not_null()
                .default(false),
        )
        .col(
            ColumnDef::new(MediaItem::Visible)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(MediaItem::SortOrder)
                .integer()
                .not_null()
                .default(0),
        )
        .col(ColumnDef::new(MediaItem::TakenAt).timestamp())
        .col(ColumnDef::new(MediaItem::UploadedBy).string_len(32))
        .col(
            ColumnDef::new(MediaItem::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(MediaItem::UpdatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

fn create_media_item_indexes(_: DatabaseBackend) -> Option<Vec<IndexCreateStatement>> {
    Some(vec![
        Index::create()
            .name("idx_media_items_category")
            .table(MediaItem::Table)
            .col(MediaItem::Category)
            .to_owned(),
        Index::create()
            .name("ux_media_items_file_name")
            .table(MediaItem::Table)
            .col(MediaItem::FileName)
            .unique()
            .to_owned(),
    ])
}
