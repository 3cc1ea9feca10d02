use crate::expect_deleted;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QueryTrait, Set, TransactionTrait,
};
use serde_json::Value as Json;
use tracing::debug;
use wedding_cms::PAGE;
use wedding_error::StorageResult;
use wedding_models::entities::prelude::{
    CmsDocument, CmsDocumentActiveModel, CmsDocumentColumn, CmsDocumentModel,
};

pub struct ContentRepository;

/// `slug.current` of a page document.
fn page_slug(content: &Json) -> Option<&str> {
    content
        .get("slug")
        .and_then(|s| s.get("current"))
        .and_then(Json::as_str)
}

impl ContentRepository {
    pub async fn find_by_id<C: ConnectionTrait>(
        id: &str,
        db: &C,
    ) -> StorageResult<Option<CmsDocumentModel>> {
        Ok(CmsDocument::find_by_id(id.to_string()).one(db).await?)
    }

    /// Documents of one type, or all of them, most recently edited first.
    pub async fn list_by_type<C: ConnectionTrait>(
        doc_type: Option<&str>,
        db: &C,
    ) -> StorageResult<Vec<CmsDocumentModel>> {
        Ok(CmsDocument::find()
            .apply_if(doc_type, |q, t| q.filter(CmsDocumentColumn::DocType.eq(t)))
            .order_by_desc(CmsDocumentColumn::UpdatedAt)
            .order_by_asc(CmsDocumentColumn::Id)
            .all(db)
            .await?)
    }

    pub async fn find_many_by_ids<C: ConnectionTrait>(
        ids: &[String],
        db: &C,
    ) -> StorageResult<Vec<CmsDocumentModel>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(CmsDocument::find()
            .filter(CmsDocumentColumn::Id.is_in(ids.iter().cloned()))
            .all(db)
            .await?)
    }

    pub async fn find_page_by_slug<C: ConnectionTrait>(
        slug: &str,
        db: &C,
    ) -> StorageResult<Option<CmsDocumentModel>> {
        let slug = slug.trim();
        Ok(Self::list_pages(db)
            .await?
            .into_iter()
            .find(|doc| page_slug(&doc.content) == Some(slug)))
    }

    /// The page flagged `isHome`, lowest id when several are.
    pub async fn find_home_page<C: ConnectionTrait>(
        db: &C,
    ) -> StorageResult<Option<CmsDocumentModel>> {
        Ok(Self::list_pages(db).await?.into_iter().find(|doc| {
            doc.content
                .get("isHome")
                .and_then(Json::as_bool)
                .unwrap_or(false)
        }))
    }

    async fn list_pages<C: ConnectionTrait>(db: &C) -> StorageResult<Vec<CmsDocumentModel>> {
        Ok(CmsDocument::find()
            .filter(CmsDocumentColumn::DocType.eq(PAGE))
            .order_by_asc(CmsDocumentColumn::Id)
            .all(db)
            .await?)
    }

    pub async fn count<C: ConnectionTrait>(db: &C) -> StorageResult<u64> {
        Ok(CmsDocument::find().count(db).await?)
    }

    /// Inserts the document at revision 1 or replaces its content and bumps
    /// the revision. Validation happens before this is called.
    pub async fn upsert<C: TransactionTrait>(
        id: &str,
        doc_type: &str,
        content: Json,
        db: &C,
    ) -> StorageResult<CmsDocumentModel> {
        let txn = db.begin().await?;
        let saved = match Self::find_by_id(id, &txn).await? {
            Some(existing) => {
                let revision = existing.revision + 1;
                let mut doc = existing.into_active_model();
                doc.doc_type = Set(doc_type.to_string());
                doc.content = Set(content);
                doc.revision = Set(revision);
                doc.update(&txn).await?
            }
            None => {
                CmsDocumentActiveModel {
                    id: Set(id.to_string()),
                    doc_type: Set(doc_type.to_string()),
                    content: Set(content),
                    revision: Set(1),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };
        txn.commit().await?;
        debug!(id, doc_type, revision = saved.revision, "Document saved");
        Ok(saved)
    }

    pub async fn delete<C: ConnectionTrait>(id: &str, db: &C) -> StorageResult<()> {
        let result = CmsDocument::delete_by_id(id.to_string()).exec(db).await?;
        expect_deleted(result, || format!("document {id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wedding_cms::{resolve_page, section_refs, Schema, RSVP_SETTINGS, SITE_SETTINGS};
    use wedding_error::storage::StorageError;
    use wedding_storage::connect_in_memory;

    #[tokio::test]
    async fn test_upsert_bumps_revision() {
        let db = connect_in_memory().await.unwrap();
        let settings = ContentRepository::find_by_id(SITE_SETTINGS, &db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(settings.revision, 1);

        let saved = ContentRepository::upsert(
            SITE_SETTINGS,
            SITE_SETTINGS,
            json!({"title": "Ada & Grace"}),
            &db,
        )
        .await
        .unwrap();
        assert_eq!(saved.revision, 2);
        assert_eq!(saved.content["title"], "Ada & Grace");

        let created = ContentRepository::upsert("faq-1", "faqSection", json!({"items": []}), &db)
            .await
            .unwrap();
        assert_eq!(created.revision, 1);
        assert_eq!(
            ContentRepository::list_by_type(Some("faqSection"), &db)
                .await
                .unwrap()
                .len(),
            1
        );
        // seeded singletons plus the section
        assert_eq!(ContentRepository::count(&db).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_pages_by_slug_and_home() {
        let db = connect_in_memory().await.unwrap();
        ContentRepository::upsert("hero-1", "heroSection", json!({"heading": "Hi"}), &db)
            .await
            .unwrap();
        ContentRepository::upsert(
            "page-home",
            PAGE,
            json!({
                "title": "Home",
                "slug": {"current": "home"},
                "isHome": true,
                "sections": [{"_ref": "hero-1"}, {"_ref": "gone"}]
            }),
            &db,
        )
        .await
        .unwrap();
        ContentRepository::upsert(
            "page-travel",
            PAGE,
            json!({"title": "Travel", "slug": {"current": "travel"}}),
            &db,
        )
        .await
        .unwrap();

        let travel = ContentRepository::find_page_by_slug("travel", &db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(travel.id, "page-travel");
        assert!(ContentRepository::find_page_by_slug("nope", &db)
            .await
            .unwrap()
            .is_none());

        let home = ContentRepository::find_home_page(&db).await.unwrap().unwrap();
        let refs = section_refs(&home.content);
        let docs = ContentRepository::find_many_by_ids(&refs, &db).await.unwrap();
        let resolved = resolve_page(&Schema::wedding(), &home.id, home.content, |id| {
            docs.iter()
                .find(|d| d.id == id)
                .map(|d| (d.doc_type.clone(), d.content.clone()))
        });
        assert_eq!(resolved.sections.len(), 1);
        assert_eq!(resolved.missing, vec!["gone".to_string()]);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = connect_in_memory().await.unwrap();
        ContentRepository::delete(RSVP_SETTINGS, &db).await.unwrap();
        assert!(matches!(
            ContentRepository::delete(RSVP_SETTINGS, &db).await,
            Err(StorageError::EntityNotFound(_))
        ));
    }
}
