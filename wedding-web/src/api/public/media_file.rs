//! Serves stored uploads under the configured media URL prefix.

use crate::AppState;
use actix_files::NamedFile;
use actix_web::{
    http::header::{HeaderValue, CACHE_CONTROL, X_CONTENT_TYPE_OPTIONS},
    web, HttpRequest, HttpResponse,
};
use tracing::debug;
use wedding_error::{web::WebError, WebResult};

/// Stored files are never rewritten, every upload gets a fresh name.
const MEDIA_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

pub fn configure_media_file_routes(cfg: &mut web::ServiceConfig, url_prefix: &str) {
    let path = format!("{}/{{file_name}}", url_prefix.trim_end_matches('/'));
    cfg.route(&path, web::get().to(serve))
        .route(&path, web::head().to(serve));
}

async fn serve(
    req: HttpRequest,
    file_name: web::Path<String>,
    state: web::Data<AppState>,
) -> WebResult<HttpResponse> {
    let path = state
        .media
        .resolve(&file_name)
        .map_err(|e| WebError::BadRequest(e.to_string()))?;
    let file = match NamedFile::open_async(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(file = %file_name, "Media file not found");
            return Err(WebError::NotFound(format!("media file {file_name}")));
        }
        Err(e) => return Err(e.into()),
    };

    let mut res = file.use_etag(true).use_last_modified(true).into_response(&req);
    res.headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static(MEDIA_CACHE_CONTROL));
    res.headers_mut()
        .insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    Ok(res)
}
