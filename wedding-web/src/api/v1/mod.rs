//! V1 version API routes
mod auth;
mod content;
mod dashboard;
mod guest;
mod invitation;
mod media;
mod rsvp;
mod system;
mod timeline;

use crate::middleware::auth::Authentication;
use actix_web::{
    guard::{Guard, GuardContext},
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web, HttpResponse,
};
use chrono::Utc;
use wedding_models::export::export_file_name;

/// Routes guests reach from the public site, mounted under this prefix.
pub(super) const PUBLIC_PREFIX: &str = "/public";

/// API version guard for v1
pub struct ApiV1Guard;

impl Guard for ApiV1Guard {
    fn check(&self, ctx: &GuardContext<'_>) -> bool {
        // Check both Accept-Api-Version and X-API-Version headers
        ctx.head().headers().get("Accept-Api-Version").map_or_else(
            || {
                ctx.head()
                    .headers()
                    .get("X-API-Version")
                    .is_some_and(|v| v.as_bytes() == b"v1")
            },
            |v| v.as_bytes() == b"v1",
        )
    }
}

/// Configure all v1 routes
pub fn configure_v1_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_public_routes)
        .configure(configure_protected_routes);
}

/// Routes that don't require authentication
fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        format!("{}/login", auth::ROUTER_PREFIX).as_str(),
        web::post().to(auth::login),
    )
    .service(
        web::scope(PUBLIC_PREFIX)
            .configure(rsvp::configure_routes)
            .service(web::scope(media::GALLERY_PREFIX).configure(media::configure_public_routes))
            .service(
                web::scope(timeline::ROUTER_PREFIX).configure(timeline::configure_public_routes),
            )
            .service(
                web::scope(content::ROUTER_PREFIX).configure(content::configure_public_routes),
            ),
    );
}

/// Admin routes behind the version guard and bearer authentication
fn configure_protected_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .guard(ApiV1Guard)
            .wrap(Authentication)
            .service(web::scope(auth::ROUTER_PREFIX).configure(auth::configure_routes))
            .service(web::scope(invitation::ROUTER_PREFIX).configure(invitation::configure_routes))
            .service(web::scope(guest::ROUTER_PREFIX).configure(guest::configure_routes))
            .service(web::scope(media::ROUTER_PREFIX).configure(media::configure_routes))
            .service(web::scope(timeline::ROUTER_PREFIX).configure(timeline::configure_routes))
            .service(web::scope(content::ROUTER_PREFIX).configure(content::configure_routes))
            .service(web::scope(dashboard::ROUTER_PREFIX).configure(dashboard::configure_routes))
            .service(web::scope(system::ROUTER_PREFIX).configure(system::configure_routes)),
    );
}

/// CSV attachment named `{prefix}-YYYYMMDD.csv` after today's date.
pub(crate) fn csv_attachment(prefix: &str, body: String) -> HttpResponse {
    let file_name = export_file_name(prefix, Utc::now().date_naive());
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(body)
}
