//! Guest list API endpoints

use super::csv_attachment;
use crate::{validation::Operation, AppState};
use actix_web::{web, HttpResponse};
use actix_web_validator::{Json, Path, Query};
use tracing::info;
use wedding_error::{web::WebError, WebResult};
use wedding_models::{
    domain::prelude::{
        BatchDeletePayload, ChangeGuestAttendance, GuestPageParams, GuestStats, NewGuest,
        PageResult, PathId, UpdateGuest,
    },
    entities::prelude::SimpleGuestModel,
    export::to_csv,
    listing::{GuestListParams, GuestSortColumn, ListQuery, ListResult},
    web::WebResponse,
};
use wedding_repository::GuestRepository;

pub(super) const ROUTER_PREFIX: &str = "/guest";

/// # Routes
/// - GET `/list`, `/page`, `/detail/{id}`, `/export`, `/stats`
/// - POST ``, PUT ``, PUT `/change-attendance`
/// - DELETE `/{id}`, POST `/batch-delete`
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create))
        .route("", web::put().to(update))
        .route("/list", web::get().to(list))
        .route("/page", web::get().to(page))
        .route("/detail/{id}", web::get().to(get_by_id))
        .route("/change-attendance", web::put().to(change_attendance))
        .route("/batch-delete", web::post().to(batch_delete))
        .route("/export", web::get().to(export))
        .route("/stats", web::get().to(stats))
        .route("/{id}", web::delete().to(delete));
}

async fn list(
    params: web::Query<GuestListParams>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<ListResult<SimpleGuestModel, GuestSortColumn>>> {
    let records = GuestRepository::find_all(&state.db).await?;
    Ok(WebResponse::ok(params.apply(records)))
}

async fn page(
    params: Query<GuestPageParams>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<PageResult<SimpleGuestModel>>> {
    Ok(WebResponse::ok(GuestRepository::page(&params, &state.db).await?))
}

async fn get_by_id(
    params: Path<PathId>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<SimpleGuestModel>> {
    Ok(WebResponse::ok(
        GuestRepository::find_by_id(params.id, &state.db)
            .await?
            .ok_or_else(|| WebError::NotFound(format!("guest {}", params.id)))?,
    ))
}

/// A linked `invitationCode` must belong to an existing invitation.
async fn create(
    guest: Json<NewGuest>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<SimpleGuestModel>> {
    let guest = guest.into_inner();
    state
        .validator
        .validate(&guest, Operation::Create, &state.db)
        .await?;
    let created = GuestRepository::create(guest, &state.db).await?;
    info!(id = created.id, "Guest created");
    Ok(WebResponse::ok(created))
}

async fn update(
    guest: Json<UpdateGuest>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<SimpleGuestModel>> {
    let guest = guest.into_inner();
    state
        .validator
        .validate(&guest, Operation::Write, &state.db)
        .await?;
    Ok(WebResponse::ok(GuestRepository::update(guest, &state.db).await?))
}

async fn change_attendance(
    change: Json<ChangeGuestAttendance>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<SimpleGuestModel>> {
    Ok(WebResponse::ok(
        GuestRepository::change_attendance(change.into_inner(), &state.db).await?,
    ))
}

async fn delete(params: Path<PathId>, state: web::Data<AppState>) -> WebResult<WebResponse<bool>> {
    GuestRepository::delete(params.id, &state.db).await?;
    info!(id = params.id, "Guest deleted");
    Ok(WebResponse::ok(true))
}

async fn batch_delete(
    payload: Json<BatchDeletePayload>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<u64>> {
    let removed = GuestRepository::delete_many(&payload.ids, &state.db).await?;
    info!(requested = payload.ids.len(), removed, "Guests deleted");
    Ok(WebResponse::ok(removed))
}

async fn export(
    params: web::Query<GuestListParams>,
    state: web::Data<AppState>,
) -> WebResult<HttpResponse> {
    let records = GuestRepository::find_all(&state.db).await?;
    let listed = params.apply(records);
    let body = to_csv(&listed.records)?;
    info!(rows = listed.total, "Guests exported");
    Ok(csv_attachment("guests", body))
}

async fn stats(state: web::Data<AppState>) -> WebResult<WebResponse<GuestStats>> {
    let records = GuestRepository::find_all(&state.db).await?;
    Ok(WebResponse::ok(GuestStats::from_records(&records)))
}

#[cfg(test)]
mod tests {
    use crate::testing::{bearer, login_request, test_app, test_state, V1};
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_guest_links_must_exist() {
        let (state, _dir) = test_state().await;
        let app = test::init_service(test_app(state)).await;
        let login: Value = test::call_and_read_body_json(&app, login_request().to_request()).await;
        let auth = ("Authorization", bearer(&login));

        let req = test::TestRequest::post()
            .uri("/api/guest")
            .insert_header(V1)
            .insert_header(auth.clone())
            .set_json(json!({"name": "Bob", "invitationCode": "NOPE99"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/invitation")
            .insert_header(V1)
            .insert_header(auth.clone())
            .set_json(json!({"guestName": "The Smiths", "code": "FAM001", "partySize": 4}))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/api/guest")
            .insert_header(V1)
            .insert_header(auth.clone())
            .set_json(json!({"name": "Bob", "invitationCode": "fam001"}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created["data"]["invitationCode"], "FAM001");
    }

    #[actix_web::test]
    async fn test_status_filter_export_and_stats() {
        let (state, _dir) = test_state().await;
        let app = test::init_service(test_app(state)).await;
        let login: Value = test::call_and_read_body_json(&app, login_request().to_request()).await;
        let auth = ("Authorization", bearer(&login));

        for (name, attendance, plus_ones) in [
            ("Ada, the first", "yes", 1),
            ("Bob", "no", 0),
            ("Cleo", "pending", 0),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/guest")
                .insert_header(V1)
                .insert_header(auth.clone())
                .set_json(json!({"name": name, "attendance": attendance, "plusOnes": plus_ones}))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get()
            .uri("/api/guest/list?status=confirmed")
            .insert_header(V1)
            .insert_header(auth.clone())
            .to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed["data"]["total"], 1);

        let req = test::TestRequest::get()
            .uri("/api/guest/export?status=confirmed")
            .insert_header(V1)
            .insert_header(auth.clone())
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let csv = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(csv.trim_end().split("\r\n").count(), 2);
        assert!(csv.contains("\"Ada, the first\""));

        let req = test::TestRequest::get()
            .uri("/api/guest/stats")
            .insert_header(V1)
            .insert_header(auth)
            .to_request();
        let stats: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stats["data"]["total"], 3);
        assert_eq!(stats["data"]["headcount"], 2);
    }
}
