//! Content studio endpoints (schema, desk, documents) and the cached public
//! content the site renders from.

use crate::AppState;
use actix_web::{
    http::header::{self, HeaderValue},
    web, HttpRequest, HttpResponse,
};
use actix_web_validator::Json;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, instrument};
use uuid::Uuid;
use wedding_cms::{
    desk_structure, resolve_page, section_refs, DeskItem, DocumentType, PreviewValue, Schema,
    PAGE,
};
use wedding_error::{
    cms::CmsError,
    storage::{CacheError, StorageError},
    web::WebError,
    StorageResult, WebResult,
};
use wedding_models::{
    cache::{ContentCacheKey, WedCacheExt},
    domain::prelude::{DocumentQuery, DocumentSummary, UpsertDocument},
    entities::prelude::CmsDocumentModel,
    web::WebResponse,
};
use wedding_repository::ContentRepository;
use wedding_utils::hash::sha256v;

pub(super) const ROUTER_PREFIX: &str = "/content";

/// Studio routes
///
/// # Routes
/// - GET `/schema`, `/schema/{type}`: content model
/// - GET `/desk`: studio navigation
/// - GET `/documents?type=`: document list with previews
/// - GET `/documents/{id}`, `/documents/{id}/preview`
/// - PUT `/documents`: validated create or replace
/// - DELETE `/documents/{id}`
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/schema", web::get().to(schema))
        .route("/schema/{doc_type}", web::get().to(schema_type))
        .route("/desk", web::get().to(desk))
        .route("/documents", web::get().to(list_documents))
        .route("/documents", web::put().to(upsert_document))
        .route("/documents/{id}", web::get().to(get_document))
        .route("/documents/{id}", web::delete().to(delete_document))
        .route("/documents/{id}/preview", web::get().to(preview_document));
}

/// Public routes
///
/// # Routes
/// - GET `/settings/{type}`: one singleton's content
/// - GET `/pages/{slug}`: page with its sections expanded
/// - GET `/home`: the page flagged as home
pub(crate) fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/settings/{doc_type}", web::get().to(public_settings))
        .route("/pages/{slug}", web::get().to(public_page))
        .route("/home", web::get().to(public_home));
}

async fn schema(state: web::Data<AppState>) -> WebResult<WebResponse<Schema>> {
    Ok(WebResponse::ok(state.schema.as_ref().clone()))
}

async fn schema_type(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<DocumentType>> {
    Ok(WebResponse::ok(state.schema.require(&path)?.clone()))
}

async fn desk(state: web::Data<AppState>) -> WebResult<WebResponse<Vec<DeskItem>>> {
    Ok(WebResponse::ok(desk_structure(&state.schema)))
}

/// # Errors
/// - Not Found (404): `type` is not part of the content model
async fn list_documents(
    query: web::Query<DocumentQuery>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<Vec<DocumentSummary>>> {
    let doc_type = query.into_inner().doc_type;
    if let Some(doc_type) = doc_type.as_deref() {
        state.schema.require(doc_type)?;
    }
    let docs = ContentRepository::list_by_type(doc_type.as_deref(), &state.db).await?;
    Ok(WebResponse::ok(
        docs.iter()
            .map(|doc| DocumentSummary::new(&state.schema, doc))
            .collect(),
    ))
}

async fn require_document(id: &str, state: &AppState) -> WebResult<CmsDocumentModel> {
    ContentRepository::find_by_id(id, &state.db)
        .await?
        .ok_or_else(|| CmsError::DocumentNotFound(id.to_string()).into())
}

async fn get_document(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<CmsDocumentModel>> {
    Ok(WebResponse::ok(require_document(&path, &state).await?))
}

async fn preview_document(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<PreviewValue>> {
    let doc = require_document(&path, &state).await?;
    Ok(WebResponse::ok(
        DocumentSummary::new(&state.schema, &doc).preview,
    ))
}

/// Create or replace a document
///
/// # Endpoint
/// `PUT /api/content/documents`
///
/// # Description
/// Singletons are always stored under their type name. Other documents keep
/// the given id or get a fresh one. Each write bumps the revision and clears
/// the public content cache.
///
/// # Errors
/// - Bad Request (400): content fails the type's rules, the id belongs to a
///   document of another type, or a page slug is already taken
/// - Not Found (404): unknown type
#[instrument(name = "upsert-document", skip_all)]
async fn upsert_document(
    payload: Json<UpsertDocument>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<CmsDocumentModel>> {
    let UpsertDocument {
        id,
        doc_type,
        content,
    } = payload.into_inner();
    state.schema.validate_document(&doc_type, &content)?;
    check_references(&state, &doc_type, &content).await?;

    let id = if state.schema.is_singleton(&doc_type) {
        doc_type.clone()
    } else {
        id.unwrap_or_else(|| Uuid::new_v4().to_string())
    };

    if let Some(existing) = ContentRepository::find_by_id(&id, &state.db).await? {
        if existing.doc_type != doc_type {
            return Err(WebError::BadRequest(format!(
                "document `{id}` is a `{}`, not a `{doc_type}`",
                existing.doc_type
            )));
        }
    }

    if doc_type == PAGE {
        if let Some(slug) = content
            .get("slug")
            .and_then(|s| s.get("current"))
            .and_then(Value::as_str)
        {
            if let Some(other) = ContentRepository::find_page_by_slug(slug, &state.db).await? {
                if other.id != id {
                    return Err(WebError::BadRequest(format!(
                        "slug `{slug}` is already used by page `{}`",
                        other.id
                    )));
                }
            }
        }
    }

    let saved = ContentRepository::upsert(&id, &doc_type, content, &state.db).await?;
    state.invalidate_content().await?;
    info!(id = %saved.id, doc_type = %saved.doc_type, revision = saved.revision, "Document saved");
    Ok(WebResponse::ok(saved))
}

/// Rejects references whose stored target has a type the field does not allow.
async fn check_references(state: &AppState, doc_type: &str, content: &Value) -> WebResult<()> {
    let sites = state.schema.references(doc_type, content)?;
    let ids: Vec<String> = sites.iter().map(|s| s.id.clone()).collect();
    let targets: HashMap<String, String> = ContentRepository::find_many_by_ids(&ids, &state.db)
        .await?
        .into_iter()
        .map(|doc| (doc.id, doc.doc_type))
        .collect();
    Schema::check_reference_targets(&sites, &targets)?;
    Ok(())
}

/// # Errors
/// - Forbidden (403): singletons cannot be deleted
/// - Not Found (404): no such document
async fn delete_document(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<bool>> {
    let doc = require_document(&path, &state).await?;
    if state.schema.is_singleton(&doc.doc_type) {
        return Err(CmsError::SingletonDelete(doc.doc_type).into());
    }
    ContentRepository::delete(&doc.id, &state.db).await?;
    state.invalidate_content().await?;
    info!(id = %doc.id, "Document deleted");
    Ok(WebResponse::ok(true))
}

fn to_json<T: serde::Serialize>(value: &T) -> StorageResult<Value> {
    serde_json::to_value(value).map_err(|e| CacheError::Msg(e.to_string()).into())
}

/// Page document expanded with its referenced sections.
async fn resolved_page(doc: CmsDocumentModel, state: &AppState) -> StorageResult<Value> {
    let refs = section_refs(&doc.content);
    let sections: HashMap<String, (String, Value)> =
        ContentRepository::find_many_by_ids(&refs, &state.db)
            .await?
            .into_iter()
            .map(|d| (d.id, (d.doc_type, d.content)))
            .collect();
    let page = resolve_page(&state.schema, &doc.id, doc.content, |id| {
        sections.get(id).cloned()
    });
    if !page.missing.is_empty() {
        debug!(page = %page.id, missing = ?page.missing, "Page references missing sections");
    }
    to_json(&page)
}

/// JSON envelope with an ETag; a matching `If-None-Match` gets 304.
fn conditional_response(req: &HttpRequest, data: Value) -> WebResult<HttpResponse> {
    let body = serde_json::to_string(&WebResponse::ok(data))
        .map_err(|e| WebError::InternalError(e.to_string()))?;
    let etag = format!("\"{}\"", sha256v(body.as_bytes(), None));

    let matches = req
        .headers()
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split(',').any(|tag| tag.trim() == etag || tag.trim() == "*"));

    let etag = HeaderValue::from_str(&etag).map_err(|e| WebError::InternalError(e.to_string()))?;
    if matches {
        return Ok(HttpResponse::NotModified()
            .insert_header((header::ETAG, etag))
            .finish());
    }
    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .insert_header((header::ETAG, etag))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .body(body))
}

/// # Errors
/// - Not Found (404): not a singleton type, or its document is missing
async fn public_settings(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> WebResult<HttpResponse> {
    let doc_type = path.into_inner();
    if !state.schema.is_singleton(&doc_type) {
        return Err(CmsError::UnknownType(doc_type).into());
    }
    let key = ContentCacheKey::Settings(&doc_type).to_key();
    let loader = state.clone();
    let content = state
        .content_cache
        .get_or_create(key, |_| async move {
            ContentRepository::find_by_id(&doc_type, &loader.db)
                .await?
                .map(|doc| doc.content)
                .ok_or_else(|| StorageError::EntityNotFound(format!("document {doc_type}")))
        })
        .await?;
    conditional_response(&req, content)
}

/// # Errors
/// - Not Found (404): no page with that slug
async fn public_page(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> WebResult<HttpResponse> {
    let slug = path.into_inner();
    let key = ContentCacheKey::Page(&slug).to_key();
    let loader = state.clone();
    let page = state
        .content_cache
        .get_or_create(key, |_| async move {
            let doc = ContentRepository::find_page_by_slug(&slug, &loader.db)
                .await?
                .ok_or_else(|| StorageError::EntityNotFound(format!("page {slug}")))?;
            resolved_page(doc, &loader).await
        })
        .await?;
    conditional_response(&req, page)
}

async fn public_home(req: HttpRequest, state: web::Data<AppState>) -> WebResult<HttpResponse> {
    let loader = state.clone();
    let page = state
        .content_cache
        .get_or_create(ContentCacheKey::Home.to_key(), |_| async move {
            let doc = ContentRepository::find_home_page(&loader.db)
                .await?
                .ok_or_else(|| StorageError::EntityNotFound("home page".into()))?;
            resolved_page(doc, &loader).await
        })
        .await?;
    conditional_response(&req, page)
}
