//! Our-story timeline endpoints

use crate::AppState;
use actix_web::web;
use actix_web_validator::{Json, Path};
use serde::Deserialize;
use tracing::info;
use wedding_error::{web::WebError, WebResult};
use wedding_models::{
    domain::prelude::{NewTimelineEvent, PathId, UpdateTimelineEvent},
    entities::prelude::TimelineEventModel,
    web::WebResponse,
};
use wedding_repository::TimelineRepository;

pub(super) const ROUTER_PREFIX: &str = "/timeline";

/// Admin routes
///
/// # Routes
/// - GET `/list`: every event, hidden ones included
/// - GET `/detail/{id}`
/// - POST ``, PUT ``
/// - DELETE `/{id}`
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create))
        .route("", web::put().to(update))
        .route("/list", web::get().to(list))
        .route("/detail/{id}", web::get().to(get_by_id))
        .route("/{id}", web::delete().to(delete));
}

/// Public route: GET `` with an optional `limit`
pub(crate) fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(visible));
}

#[derive(Debug, Default, Deserialize)]
struct TimelineQuery {
    limit: Option<u64>,
}

async fn list(state: web::Data<AppState>) -> WebResult<WebResponse<Vec<TimelineEventModel>>> {
    Ok(WebResponse::ok(TimelineRepository::find_all(&state.db).await?))
}

async fn get_by_id(
    params: Path<PathId>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<TimelineEventModel>> {
    Ok(WebResponse::ok(
        TimelineRepository::find_by_id(params.id, &state.db)
            .await?
            .ok_or_else(|| WebError::NotFound(format!("timeline event {}", params.id)))?,
    ))
}

async fn create(
    event: Json<NewTimelineEvent>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<TimelineEventModel>> {
    let created = TimelineRepository::create(event.into_inner(), &state.db).await?;
    info!(id = created.id, "Timeline event created");
    Ok(WebResponse::ok(created))
}

async fn update(
    event: Json<UpdateTimelineEvent>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<TimelineEventModel>> {
    Ok(WebResponse::ok(
        TimelineRepository::update(event.into_inner(), &state.db).await?,
    ))
}

async fn delete(params: Path<PathId>, state: web::Data<AppState>) -> WebResult<WebResponse<bool>> {
    TimelineRepository::delete(params.id, &state.db).await?;
    info!(id = params.id, "Timeline event deleted");
    Ok(WebResponse::ok(true))
}

async fn visible(
    query: web::Query<TimelineQuery>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<Vec<TimelineEventModel>>> {
    Ok(WebResponse::ok(
        TimelineRepository::find_visible(query.limit, &state.db).await?,
    ))
}

#[cfg(test)]
mod tests {
    use crate::testing::{bearer, login_request, test_app, test_state, V1};
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_public_timeline_hides_events_and_honours_limit() {
        let (state, _dir) = test_state().await;
        let app = test::init_service(test_app(state)).await;
        let login: Value = test::call_and_read_body_json(&app, login_request().to_request()).await;
        let auth = ("Authorization", bearer(&login));

        for (title, at, visible) in [
            ("Proposal", "2024-06-01T18:00:00Z", true),
            ("First date", "2019-02-14T19:30:00Z", true),
            ("Secret", "2020-01-01T00:00:00Z", false),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/timeline")
                .insert_header(V1)
                .insert_header(auth.clone())
                .set_json(json!({"title": title, "occurredAt": at, "visible": visible}))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get()
            .uri("/api/timeline/list")
            .insert_header(V1)
            .insert_header(auth.clone())
            .to_request();
        let all: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(all["data"].as_array().unwrap().len(), 3);

        let req = test::TestRequest::get().uri("/api/public/timeline").to_request();
        let public: Value = test::call_and_read_body_json(&app, req).await;
        let titles: Vec<&str> = public["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["First date", "Proposal"]);

        let req = test::TestRequest::get()
            .uri("/api/public/timeline?limit=1")
            .to_request();
        let limited: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(limited["data"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::post()
            .uri("/api/timeline")
            .insert_header(V1)
            .insert_header(auth)
            .set_json(json!({"title": "", "occurredAt": "2024-06-01T18:00:00Z"}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }
}
