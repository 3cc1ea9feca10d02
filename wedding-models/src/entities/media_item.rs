use crate::enums::common::MediaKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "media_items")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub kind: MediaKind,
    /// Name of the file inside the media root
    #[sea_orm(unique)]
    pub file_name: String,
    /// Name the file was uploaded with
    pub original_name: String,
    pub mime: String,
    pub size_bytes: i64,
    pub featured: bool,
    pub visible: bool,
    pub sort_order: i32,
    pub taken_at: Option<DateTimeUtc>,
    /// Invitation code for guest uploads, `None` for admin uploads
    pub uploaded_by: Option<String>,
    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
