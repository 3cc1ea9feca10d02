use crate::{
    domain::prelude::NewCmsDocument,
    initializer::{
        DataSeederTrait, InitContext, SeedableInitializerTrait, SeedableTrait, WedInitializer,
    },
};
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::prelude::*;
use wedding_cms::Schema;
use wedding_macros::SeedableInitializer;

#[derive(DeriveIden, SeedableInitializer)]
#[seedable(meta(
    name = "cms_documents",
    model = NewCmsDocument,
    order = super::INIT_CMS_DOCUMENT_ORDER,
    create_table = create_cms_document_table,
    create_indexes = create_cms_document_indexes,
    seed_data = get_cms_document_seed_data
))]
pub enum CmsDocument {
    #[sea_orm(iden = "cms_documents")]
    Table,
    Id,
    DocType,
    Content,
    Revision,
    CreatedAt,
    UpdatedAt,
}

fn create_cms_document_table(_backend: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(CmsDocument::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(CmsDocument::Id)
                .string_len(128)
                .not_null()
                .primary_key(),
        )
        .col(
            ColumnDef::new(CmsDocument::DocType)
                .string_len(64)
                .not_null()
                .comment("schema type name"),
        )
        .col(ColumnDef::new(CmsDocument::Content).json().not_null())
        .col(
            ColumnDef::new(CmsDocument::Revision)
                .integer()
                .not_null()
                .default(1),
        )
        .col(
            ColumnDef::new(CmsDocument::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(CmsDocument::UpdatedAt)
                .timestamp()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

fn create_cms_document_indexes(_: DatabaseBackend) -> Option<Vec<IndexCreateStatement>> {
    Some(vec![Index::create()
        .name("idx_cms_documents_doc_type")
        .table(CmsDocument::Table)
        .col(CmsDocument::DocType)
        .to_owned()])
}

/// Every singleton starts out with its declared initial values.
async fn get_cms_document_seed_data(
    _: &mut InitContext,
) -> Result<Option<Vec<NewCmsDocument>>, DbErr> {
    let schema = Schema::wedding();
    Ok(Some(
        schema
            .singletons()
            .map(|ty| NewCmsDocument {
                id: ty.name.clone(),
                doc_type: ty.name.clone(),
                content: ty.initial_content(),
                revision: 1,
            })
            .collect(),
    ))
}
