//! Serves the built frontend from disk.
//!
//! Every path the API did not claim is looked up under the site root. Paths
//! without a file extension fall back to `index.html` so client-side routes
//! like `/rsvp/ABCD1234` load the app. Hashed assets get a long cache, the
//! index is always revalidated.

use actix_files::NamedFile;
use actix_web::{
    http::header::{self, HeaderValue},
    web::{self, Data},
    HttpRequest, HttpResponse,
};
use std::path::{Path, PathBuf};
use wedding_models::settings::Settings;

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub api_prefix: String,
    pub root: PathBuf,
}

impl SiteConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            api_prefix: settings.web.router_prefix.clone(),
            root: PathBuf::from(settings.web.site.root.as_str()),
        }
    }
}

pub fn configure_site_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{path:.*}")
            .route(web::get().to(site_handler))
            .route(web::head().to(site_handler)),
    );
}

async fn site_handler(req: HttpRequest, site: Data<SiteConfig>) -> HttpResponse {
    // unknown API paths stay 404 instead of returning the app shell
    if req.path().starts_with(site.api_prefix.as_str()) {
        return HttpResponse::NotFound().finish();
    }

    let key = normalize_req_path(req.path());
    if key.contains("..") || key.contains('\\') {
        return HttpResponse::BadRequest().finish();
    }

    let root = Path::new(&site.root);
    if let Ok(file) = NamedFile::open_async(root.join(&key)).await {
        return build_response(&req, file, &key);
    }

    if should_fallback_to_index(&key) {
        if let Ok(file) = NamedFile::open_async(root.join("index.html")).await {
            return build_response(&req, file, "index.html");
        }
        tracing::warn!(root = %root.display(), "Site enabled but index.html missing");
    }

    HttpResponse::NotFound().finish()
}

fn build_response(req: &HttpRequest, file: NamedFile, key: &str) -> HttpResponse {
    let mut resp = file.into_response(req);
    resp.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control_for_path(key)),
    );
    resp.headers_mut().insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    resp
}

#[inline]
fn normalize_req_path(path: &str) -> String {
    let p = path.trim_start_matches('/');
    if p.is_empty() {
        "index.html".to_string()
    } else {
        p.to_string()
    }
}

/// `/gallery` -> true, `/assets/app.js` -> false
#[inline]
fn should_fallback_to_index(key: &str) -> bool {
    !key.rsplit('/').next().unwrap_or(key).contains('.')
}

fn cache_control_for_path(key: &str) -> &'static str {
    if key == "index.html" {
        return "no-cache";
    }
    match key.rsplit('.').next().unwrap_or("") {
        "js" | "css" | "png" | "jpg" | "jpeg" | "svg" | "webp" | "avif" | "woff" | "woff2" => {
            "public, max-age=31536000, immutable"
        }
        _ => "public, max-age=3600",
    }
}
