//! Invitation management API endpoints

use super::csv_attachment;
use crate::{validation::Operation, AppState};
use actix_web::{web, HttpResponse};
use actix_web_validator::{Json, Path, Query};
use tracing::{info, instrument};
use wedding_error::{web::WebError, WebResult};
use wedding_models::{
    domain::prelude::{
        BatchDeletePayload, InvitationPageParams, InvitationStats, NewInvitation, PageResult,
        PathId, UpdateInvitation,
    },
    entities::prelude::InvitationModel,
    export::to_csv,
    listing::{InvitationListParams, InvitationSortColumn, ListQuery, ListResult},
    web::WebResponse,
};
use wedding_repository::InvitationRepository;

pub(super) const ROUTER_PREFIX: &str = "/invitation";

/// Configure invitation routes
///
/// # Routes
/// - GET `/list`: search, filter and sort every invitation
/// - GET `/page`: database-side page
/// - GET `/detail/{id}`: one invitation
/// - POST ``: create, generating a code when none is given
/// - PUT ``: update
/// - DELETE `/{id}`: delete
/// - POST `/batch-delete`: delete several
/// - PUT `/{id}/reset-tracking`: zero the open counters
/// - GET `/export`: CSV of the filtered list
/// - GET `/stats`: RSVP totals
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create))
        .route("", web::put().to(update))
        .route("/list", web::get().to(list))
        .route("/page", web::get().to(page))
        .route("/detail/{id}", web::get().to(get_by_id))
        .route("/batch-delete", web::post().to(batch_delete))
        .route("/export", web::get().to(export))
        .route("/stats", web::get().to(stats))
        .route("/{id}/reset-tracking", web::put().to(reset_tracking))
        .route("/{id}", web::delete().to(delete));
}

/// Search, filter and sort over all invitations
///
/// # Endpoint
/// `GET /api/invitation/list`
///
/// # Parameters
/// - `search`: matched against guest name, partner name, email, phone and code
/// - `relationship`, `rsvp`, `attendance`: filters
/// - `sortBy`, `sortDir`: ordering; `headerSorts` in the response gives the
///   state a click on each column header produces
async fn list(
    params: web::Query<InvitationListParams>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<ListResult<InvitationModel, InvitationSortColumn>>> {
    let records = InvitationRepository::find_all(&state.db).await?;
    Ok(WebResponse::ok(params.apply(records)))
}

/// Paginated invitations
///
/// # Endpoint
/// `GET /api/invitation/page`
async fn page(
    params: Query<InvitationPageParams>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<PageResult<InvitationModel>>> {
    Ok(WebResponse::ok(
        InvitationRepository::page(&params, &state.db).await?,
    ))
}

/// # Endpoint
/// `GET /api/invitation/detail/{id}`
///
/// # Errors
/// - Not Found (404): no invitation with that id
async fn get_by_id(
    params: Path<PathId>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<InvitationModel>> {
    Ok(WebResponse::ok(
        InvitationRepository::find_by_id(params.id, &state.db)
            .await?
            .ok_or_else(|| WebError::NotFound(format!("invitation {}", params.id)))?,
    ))
}

/// Create an invitation
///
/// # Endpoint
/// `POST /api/invitation`
///
/// # Errors
/// - Bad Request (400): invalid payload or a code already in use
#[instrument(name = "create-invitation", skip_all)]
async fn create(
    invitation: Json<NewInvitation>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<InvitationModel>> {
    let invitation = invitation.into_inner();
    state
        .validator
        .validate(&invitation, Operation::Create, &state.db)
        .await?;
    let created =
        InvitationRepository::create(invitation, state.settings.rsvp.code_length, &state.db)
            .await?;
    info!(id = created.id, code = %created.code, "Invitation created");
    Ok(WebResponse::ok(created))
}

/// Update an invitation
///
/// # Endpoint
/// `PUT /api/invitation`
///
/// # Errors
/// - Bad Request (400): invalid payload or a code another invitation uses
/// - Not Found (404): no invitation with that id
async fn update(
    invitation: Json<UpdateInvitation>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<InvitationModel>> {
    let invitation = invitation.into_inner();
    state
        .validator
        .validate(&invitation, Operation::Write, &state.db)
        .await?;
    Ok(WebResponse::ok(
        InvitationRepository::update(invitation, &state.db).await?,
    ))
}

/// # Endpoint
/// `DELETE /api/invitation/{id}`
///
/// # Errors
/// - Not Found (404): no invitation with that id, including one already deleted
async fn delete(params: Path<PathId>, state: web::Data<AppState>) -> WebResult<WebResponse<bool>> {
    InvitationRepository::delete(params.id, &state.db).await?;
    info!(id = params.id, "Invitation deleted");
    Ok(WebResponse::ok(true))
}

/// # Endpoint
/// `POST /api/invitation/batch-delete`
///
/// # Returns
/// Number of invitations removed
async fn batch_delete(
    payload: Json<BatchDeletePayload>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<u64>> {
    let removed = InvitationRepository::delete_many(&payload.ids, &state.db).await?;
    info!(requested = payload.ids.len(), removed, "Invitations deleted");
    Ok(WebResponse::ok(removed))
}

/// # Endpoint
/// `PUT /api/invitation/{id}/reset-tracking`
async fn reset_tracking(
    params: Path<PathId>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<InvitationModel>> {
    Ok(WebResponse::ok(
        InvitationRepository::reset_tracking(params.id, &state.db).await?,
    ))
}

/// CSV of exactly what `/list` returns for the same parameters
///
/// # Endpoint
/// `GET /api/invitation/export`
async fn export(
    params: web::Query<InvitationListParams>,
    state: web::Data<AppState>,
) -> WebResult<HttpResponse> {
    let records = InvitationRepository::find_all(&state.db).await?;
    let listed = params.apply(records);
    let body = to_csv(&listed.records)?;
    info!(rows = listed.total, "Invitations exported");
    Ok(csv_attachment("invitations", body))
}

/// # Endpoint
/// `GET /api/invitation/stats`
async fn stats(state: web::Data<AppState>) -> WebResult<WebResponse<InvitationStats>> {
    let records = InvitationRepository::find_all(&state.db).await?;
    Ok(WebResponse::ok(InvitationStats::from_records(&records)))
}

#[cfg(test)]
mod tests {
    use crate::testing::{bearer, login_request, test_app, test_state, V1};
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_crud_and_duplicate_codes() {
        let (state, _dir) = test_state().await;
        let app = test::init_service(test_app(state)).await;
        let login: Value = test::call_and_read_body_json(&app, login_request().to_request()).await;
        let auth = ("Authorization", bearer(&login));

        let req = test::TestRequest::post()
            .uri("/api/invitation")
            .insert_header(V1)
            .insert_header(auth.clone())
            .set_json(json!({"guestName": "Ada", "code": "love24", "partySize": 2}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created["data"]["code"], "LOVE24");
        let id = created["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri("/api/invitation")
            .insert_header(V1)
            .insert_header(auth.clone())
            .set_json(json!({"guestName": "Bob", "code": "LOVE24"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/invitation")
            .insert_header(V1)
            .insert_header(auth.clone())
            .set_json(json!({"guestName": "Bob"}))
            .to_request();
        let generated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(generated["data"]["code"].as_str().unwrap().len(), 8);

        let req = test::TestRequest::post()
            .uri("/api/guest")
            .insert_header(V1)
            .insert_header(auth.clone())
            .set_json(json!({"name": "Ada", "invitationCode": "LOVE24"}))
            .to_request();
        let guest: Value = test::call_and_read_body_json(&app, req).await;
        let guest_id = guest["data"]["id"].as_i64().unwrap();

        let req = test::TestRequest::delete()
            .uri(&format!("/api/invitation/{id}"))
            .insert_header(V1)
            .insert_header(auth.clone())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        // the guest stays but no longer points at the deleted code
        let req = test::TestRequest::get()
            .uri(&format!("/api/guest/detail/{guest_id}"))
            .insert_header(V1)
            .insert_header(auth.clone())
            .to_request();
        let guest: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(guest["data"]["invitationCode"], Value::Null);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/invitation/{id}"))
            .insert_header(V1)
            .insert_header(auth.clone())
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn test_list_and_export_share_filters() {
        let (state, _dir) = test_state().await;
        let app = test::init_service(test_app(state)).await;
        let login: Value = test::call_and_read_body_json(&app, login_request().to_request()).await;
        let auth = ("Authorization", bearer(&login));

        for (name, relationship) in [("Zoe", "family"), ("ada", "family"), ("Max", "friend")] {
            let req = test::TestRequest::post()
                .uri("/api/invitation")
                .insert_header(V1)
                .insert_header(auth.clone())
                .set_json(json!({"guestName": name, "relationship": relationship}))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get()
            .uri("/api/invitation/list?relationship=family&sortBy=guestName&sortDir=asc")
            .insert_header(V1)
            .insert_header(auth.clone())
            .to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed["data"]["total"], 2);
        assert_eq!(listed["data"]["records"][0]["guestName"], "ada");
        assert_eq!(listed["data"]["headerSorts"]["guestName"]["direction"], "desc");

        let req = test::TestRequest::get()
            .uri("/api/invitation/export?relationship=family&sortBy=guestName")
            .insert_header(V1)
            .insert_header(auth.clone())
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get("content-type").unwrap(),
            "text/csv; charset=utf-8"
        );
        let disposition = res
            .headers()
            .get("content-disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"invitations-"));
        let body = String::from_utf8(test::read_body(res).await.to_vec()).unwrap();
        let lines: Vec<&str> = body.trim_end().split("\r\n").collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("ada"));
        assert!(lines[2].contains("Zoe"));
    }

    #[actix_web::test]
    async fn test_stats_count_expected_headcount() {
        let (state, _dir) = test_state().await;
        let app = test::init_service(test_app(state)).await;
        let login: Value = test::call_and_read_body_json(&app, login_request().to_request()).await;
        let auth = ("Authorization", bearer(&login));

        let req = test::TestRequest::post()
            .uri("/api/invitation")
            .insert_header(V1)
            .insert_header(auth.clone())
            .set_json(json!({"guestName": "Ada", "code": "ADA001", "partySize": 3}))
            .to_request();
        test::call_service(&app, req).await;
        let req = test::TestRequest::post()
            .uri("/api/public/invitation/ADA001/rsvp")
            .set_json(json!({"attending": true, "partySize": 2}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/invitation/stats")
            .insert_header(V1)
            .insert_header(auth)
            .to_request();
        let stats: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(stats["data"]["attending"], 1);
        assert_eq!(stats["data"]["expectedHeadcount"], 2);
    }
}
