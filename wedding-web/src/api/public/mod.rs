//! Routes mounted at the root, outside the API router prefix: the health
//! probe and the uploaded media files.

mod health;
mod media_file;

use actix_web::web;

#[inline]
pub fn configure_public_routes(cfg: &mut web::ServiceConfig, media_url_prefix: &str) {
    cfg.configure(health::configure_health_routes)
        .configure(|cfg| media_file::configure_media_file_routes(cfg, media_url_prefix));
}
