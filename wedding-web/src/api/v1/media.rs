//! Media gallery endpoints: admin management and the public gallery.

use crate::{
    upload::{read_media_upload, MediaUpload},
    AppState,
};
use actix_multipart::Multipart;
use actix_web::web;
use actix_web_validator::{Json, Path};
use tracing::{info, instrument, warn};
use wedding_error::{web::WebError, WebResult};
use wedding_models::{
    domain::prelude::{
        CategorySummary, ChangeMediaFlags, GalleryQuery, MediaInfo, Neighbors, NewMediaItem,
        PathId, UpdateMediaItem,
    },
    entities::prelude::MediaItemModel,
    listing::MediaListParams,
    settings::Settings,
    web::WebResponse,
};
use wedding_repository::MediaRepository;

pub(super) const ROUTER_PREFIX: &str = "/media";
pub(super) const GALLERY_PREFIX: &str = "/gallery";

/// Admin routes
///
/// # Routes
/// - GET `/list`: every item, filtered by `search`, `category`, `featured`, `visible`, `kind`
/// - GET `/categories`: item count per category
/// - POST `/upload`: multipart `file` + `category` [+ `title`, `description`, `featured`, `visible`, `sortOrder`]
/// - PUT ``: metadata update
/// - PUT `/flags`: featured / visible
/// - DELETE `/{id}`: row and stored file
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::put().to(update))
        .route("/list", web::get().to(list))
        .route("/categories", web::get().to(categories))
        .route("/upload", web::post().to(upload))
        .route("/flags", web::put().to(change_flags))
        .route("/{id}", web::delete().to(delete));
}

/// Public gallery routes
///
/// # Routes
/// - GET ``: visible items, optionally one `category`
/// - GET `/categories`: visible item count per category
/// - GET `/{id}/neighbors`: previous / next ids for the lightbox
pub(crate) fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(gallery))
        .route("/categories", web::get().to(gallery_categories))
        .route("/{id}/neighbors", web::get().to(neighbors));
}

fn with_urls(settings: &Settings, items: Vec<MediaItemModel>) -> Vec<MediaInfo> {
    items
        .into_iter()
        .map(|item| MediaInfo {
            url: settings.media.url_for(&item.file_name),
            item,
        })
        .collect()
}

async fn list(
    params: web::Query<MediaListParams>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<Vec<MediaInfo>>> {
    let items = params.apply(MediaRepository::find_all(&state.db).await?);
    Ok(WebResponse::ok(with_urls(&state.settings, items)))
}

async fn categories(state: web::Data<AppState>) -> WebResult<WebResponse<Vec<CategorySummary>>> {
    let items = MediaListParams::default().apply(MediaRepository::find_all(&state.db).await?);
    Ok(WebResponse::ok(CategorySummary::summarize(&items)))
}

/// Stores an upload and its row. The file is only moved into place once the
/// form is valid, and removed again if the row cannot be written.
#[instrument(name = "upload-media", skip_all)]
async fn upload(
    mut multipart: Multipart,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<MediaInfo>> {
    let upload = read_media_upload(&mut multipart, &state.media, &state.settings.media).await?;
    let category = upload
        .text("category")
        .ok_or_else(|| WebError::BadRequest("category is required".into()))?
        .to_string();
    let new = NewMediaItem {
        title: upload.title(),
        description: upload.text("description").map(str::to_string),
        category,
        kind: upload.kind,
        file_name: String::new(),
        original_name: upload.original_name.clone(),
        mime: upload.mime.clone(),
        size_bytes: upload.size_bytes(),
        featured: upload.flag("featured").unwrap_or(false),
        visible: upload.flag("visible").unwrap_or(true),
        sort_order: upload.number("sortOrder").unwrap_or(0),
        uploaded_by: None,
    };
    let item = store_upload(&state, upload, new).await?;
    info!(id = item.id, file = %item.file_name, "Media uploaded");
    Ok(WebResponse::ok(MediaInfo {
        url: state.settings.media.url_for(&item.file_name),
        item,
    }))
}

/// Persists the staged file under its generated name and inserts `new` for it.
pub(super) async fn store_upload(
    state: &AppState,
    upload: MediaUpload,
    mut new: NewMediaItem,
) -> WebResult<MediaItemModel> {
    new.file_name = upload.staged.persist().await?;
    match MediaRepository::create(new.clone(), &state.db).await {
        Ok(item) => Ok(item),
        Err(e) => {
            if let Err(remove) = state.media.remove(&new.file_name).await {
                warn!(file = %new.file_name, error = %remove, "Failed to remove orphaned upload");
            }
            Err(e.into())
        }
    }
}

async fn update(
    item: Json<UpdateMediaItem>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<MediaInfo>> {
    let item = MediaRepository::update(item.into_inner(), &state.db).await?;
    Ok(WebResponse::ok(MediaInfo {
        url: state.settings.media.url_for(&item.file_name),
        item,
    }))
}

async fn change_flags(
    change: Json<ChangeMediaFlags>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<MediaItemModel>> {
    Ok(WebResponse::ok(
        MediaRepository::change_flags(change.into_inner(), &state.db).await?,
    ))
}

/// A file that is already gone does not fail the delete.
async fn delete(params: Path<PathId>, state: web::Data<AppState>) -> WebResult<WebResponse<bool>> {
    let item = MediaRepository::delete(params.id, &state.db).await?;
    match state.media.remove(&item.file_name).await {
        Ok(true) => {}
        Ok(false) => warn!(file = %item.file_name, "Deleted media had no stored file"),
        Err(e) => warn!(file = %item.file_name, error = %e, "Failed to remove media file"),
    }
    info!(id = item.id, "Media deleted");
    Ok(WebResponse::ok(true))
}

async fn visible_items(
    state: &AppState,
    category: Option<String>,
) -> WebResult<Vec<MediaItemModel>> {
    let items = MediaRepository::find_visible(&state.db).await?;
    Ok(MediaListParams::public(category).apply(items))
}

async fn gallery(
    query: web::Query<GalleryQuery>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<Vec<MediaInfo>>> {
    let items = visible_items(&state, query.into_inner().category).await?;
    Ok(WebResponse::ok(with_urls(&state.settings, items)))
}

async fn gallery_categories(
    state: web::Data<AppState>,
) -> WebResult<WebResponse<Vec<CategorySummary>>> {
    let items = visible_items(&state, None).await?;
    Ok(WebResponse::ok(CategorySummary::summarize(&items)))
}

/// Position of one visible item within the gallery, optionally within one category.
async fn neighbors(
    params: Path<PathId>,
    query: web::Query<GalleryQuery>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<Neighbors>> {
    let items = visible_items(&state, query.into_inner().category).await?;
    let ids: Vec<i32> = items.iter().map(|i| i.id).collect();
    Neighbors::locate(&ids, params.id)
        .map(WebResponse::ok)
        .ok_or_else(|| WebError::NotFound(format!("media {}", params.id)))
}
