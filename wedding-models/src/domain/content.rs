use crate::{
    entities::cms_document::{ActiveModel, Entity as CmsDocumentEntity, Model as CmsDocumentModel},
    initializer::SeedableTrait,
};
use chrono::{DateTime, Utc};
use sea_orm::{DeriveIntoActiveModel, IntoActiveModel};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use validator::Validate;
use wedding_cms::{PreviewValue, Schema};

#[derive(Clone, Debug, PartialEq, DeriveIntoActiveModel)]
pub struct NewCmsDocument {
    pub id: String,
    pub doc_type: String,
    pub content: Json,
    pub revision: i32,
}

impl SeedableTrait for NewCmsDocument {
    type ActiveModel = ActiveModel;
    type Entity = CmsDocumentEntity;

    fn get_active_model(&self) -> Self::ActiveModel {
        self.clone().into_active_model()
    }
}

/// Create-or-replace request. Singleton types ignore `id`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertDocument {
    #[validate(length(min = 1, max = 128, message = "id must be 1 to 128 characters"))]
    pub id: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type is required"))]
    pub doc_type: String,
    pub content: Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentQuery {
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
}

/// Desk list row
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub revision: i32,
    pub updated_at: Option<DateTime<Utc>>,
    pub preview: PreviewValue,
}

impl DocumentSummary {
    pub fn new(schema: &Schema, doc: &CmsDocumentModel) -> Self {
        let preview = schema
            .get(&doc.doc_type)
            .map(|ty| ty.preview_of(&doc.content))
            .unwrap_or_else(PreviewValue::untitled);
        Self {
            id: doc.id.clone(),
            doc_type: doc.doc_type.clone(),
            revision: doc.revision,
            updated_at: doc.updated_at,
            preview,
        }
    }
}
