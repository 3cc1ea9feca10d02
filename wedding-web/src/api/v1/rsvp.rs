//! Guest-facing invitation endpoints. Guests identify themselves with the
//! invitation code from their link, so nothing here needs a token.

use super::media::store_upload;
use crate::{upload::read_media_upload, AppState};
use actix_multipart::Multipart;
use actix_web::web;
use actix_web_validator::Json;
use chrono::Utc;
use tracing::{info, instrument};
use wedding_cms::RsvpWindow;
use wedding_error::{web::WebError, WebResult};
use wedding_models::{
    constants::GUEST_PHOTO_CATEGORY,
    domain::prelude::{
        MediaInfo, NewMediaItem, PathCode, PublicInvitation, RsvpRequest, SelfRegistration,
        SelfRegistrationResponse,
    },
    web::WebResponse,
};
use wedding_repository::{ContentRepository, InvitationRepository};

/// # Routes
/// - GET `/invitation/{code}`: invitation view, counted as an open
/// - POST `/invitation/{code}/rsvp`: answer
/// - PUT `/invitation/{code}/gift`: gift step done
/// - POST `/invitation/{code}/photos`: multipart photo from the guest
/// - POST `/register`: self-registration
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/invitation/{code}", web::get().to(open))
        .route("/invitation/{code}/rsvp", web::post().to(submit_rsvp))
        .route("/invitation/{code}/gift", web::put().to(mark_gift))
        .route("/invitation/{code}/photos", web::post().to(upload_photo))
        .route("/register", web::post().to(register));
}

/// Open an invitation
///
/// # Endpoint
/// `GET /api/public/invitation/{code}`
///
/// # Errors
/// - Not Found (404): unknown code
async fn open(
    params: web::Path<PathCode>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<PublicInvitation>> {
    let invitation = InvitationRepository::record_open(&params.code, &state.db).await?;
    Ok(WebResponse::ok(invitation.into()))
}

/// Current RSVP window; open when the settings document is absent.
async fn rsvp_window(state: &AppState) -> WebResult<RsvpWindow> {
    Ok(ContentRepository::find_by_id(RsvpWindow::DOC_ID, &state.db)
        .await?
        .map(|doc| RsvpWindow::from_content(&doc.content))
        .unwrap_or_default())
}

/// Submit an RSVP
///
/// # Endpoint
/// `POST /api/public/invitation/{code}/rsvp`
///
/// # Errors
/// - Bad Request (400): party size above the invitation's or the site limit
/// - Forbidden (403): responses are closed or the deadline has passed
/// - Not Found (404): unknown code
#[instrument(name = "submit-rsvp", skip_all, fields(code = %params.code))]
async fn submit_rsvp(
    params: web::Path<PathCode>,
    rsvp: Json<RsvpRequest>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<PublicInvitation>> {
    if !rsvp_window(&state).await?.accepts(Utc::now()) {
        return Err(WebError::Forbidden("RSVP is closed".into()));
    }

    let invitation = InvitationRepository::require_by_code(&params.code, &state.db).await?;
    let confirmed = rsvp.confirmed_party_size();
    if confirmed > invitation.party_size {
        return Err(WebError::BadRequest(format!(
            "partySize {confirmed} exceeds the {} seats on this invitation",
            invitation.party_size
        )));
    }
    let max = state.settings.rsvp.max_party_size;
    if confirmed > max {
        return Err(WebError::BadRequest(format!(
            "partySize {confirmed} exceeds the limit of {max}"
        )));
    }

    let updated = InvitationRepository::submit_rsvp(&params.code, &rsvp, &state.db).await?;
    info!(attendance = ?updated.attendance, party = confirmed, "RSVP received");
    Ok(WebResponse::ok(updated.into()))
}

async fn mark_gift(
    params: web::Path<PathCode>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<PublicInvitation>> {
    let invitation = InvitationRepository::mark_gift(&params.code, &state.db).await?;
    Ok(WebResponse::ok(invitation.into()))
}

/// Guest photo upload
///
/// # Endpoint
/// `POST /api/public/invitation/{code}/photos`
///
/// # Description
/// Stored hidden in the guest photo category until an admin publishes it.
async fn upload_photo(
    params: web::Path<PathCode>,
    mut multipart: Multipart,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<MediaInfo>> {
    let invitation = InvitationRepository::require_by_code(&params.code, &state.db).await?;
    let upload = read_media_upload(&mut multipart, &state.media, &state.settings.media).await?;
    let new = NewMediaItem {
        title: upload.title(),
        description: upload.text("description").map(str::to_string),
        category: GUEST_PHOTO_CATEGORY.to_string(),
        kind: upload.kind,
        file_name: String::new(),
        original_name: upload.original_name.clone(),
        mime: upload.mime.clone(),
        size_bytes: upload.size_bytes(),
        featured: false,
        visible: false,
        sort_order: 0,
        uploaded_by: Some(invitation.code.clone()),
    };
    let item = store_upload(&state, upload, new).await?;
    InvitationRepository::mark_photo(&invitation.code, &state.db).await?;
    info!(code = %invitation.code, id = item.id, "Guest photo uploaded");
    Ok(WebResponse::ok(MediaInfo {
        url: state.settings.media.url_for(&item.file_name),
        item,
    }))
}

/// Self-registration
///
/// # Endpoint
/// `POST /api/public/register`
///
/// # Errors
/// - Forbidden (403): registration is turned off
async fn register(
    registration: Json<SelfRegistration>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<SelfRegistrationResponse>> {
    let rsvp = &state.settings.rsvp;
    if !rsvp.allow_self_registration {
        return Err(WebError::Forbidden("Self-registration is disabled".into()));
    }
    let created =
        InvitationRepository::register(registration.into_inner(), rsvp.code_length, &state.db)
            .await?;
    info!(code = %created.code, "Guest registered");
    Ok(WebResponse::ok(SelfRegistrationResponse {
        code: created.code,
        guest_name: created.guest_name,
    }))
}

#[cfg(test)]
mod tests {
    use crate::testing::{bearer, login_request, multipart_body, test_app, test_state, V1};
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_open_and_rsvp_flow() {
        let (state, _dir) = test_state().await;
        let app = test::init_service(test_app(state)).await;
        let login: Value = test::call_and_read_body_json(&app, login_request().to_request()).await;
        let auth = ("Authorization", bearer(&login));

        let req = test::TestRequest::post()
            .uri("/api/invitation")
            .insert_header(V1)
            .insert_header(auth.clone())
            .set_json(json!({"guestName": "Ada", "code": "ADA001", "partySize": 2}))
            .to_request();
        test::call_service(&app, req).await;
        let req = test::TestRequest::post()
            .uri("/api/guest")
            .insert_header(V1)
            .insert_header(auth.clone())
            .set_json(json!({"name": "Ada", "invitationCode": "ADA001"}))
            .to_request();
        test::call_service(&app, req).await;

        for _ in 0..2 {
            let req = test::TestRequest::get()
                .uri("/api/public/invitation/ADA001")
                .to_request();
            let opened: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(opened["data"]["guestName"], "Ada");
            assert!(opened["data"].get("openCount").is_none());
        }
        let req = test::TestRequest::get()
            .uri("/api/invitation/list")
            .insert_header(V1)
            .insert_header(auth.clone())
            .to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed["data"]["records"][0]["openCount"], 2);

        let req = test::TestRequest::post()
            .uri("/api/public/invitation/ADA001/rsvp")
            .set_json(json!({"attending": true, "partySize": 3}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );

        let req = test::TestRequest::post()
            .uri("/api/public/invitation/ADA001/rsvp")
            .set_json(json!({"attending": true, "partySize": 2, "dietaryNotes": "vegan"}))
            .to_request();
        let answered: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(answered["data"]["attendance"], "yes");
        assert_eq!(answered["data"]["rsvpCompleted"], true);
        assert_eq!(answered["data"]["confirmedPartySize"], 2);

        let req = test::TestRequest::get()
            .uri("/api/guest/list")
            .insert_header(V1)
            .insert_header(auth)
            .to_request();
        let guests: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(guests["data"]["records"][0]["attendance"], "yes");
        assert_eq!(guests["data"]["records"][0]["plusOnes"], 1);

        let req = test::TestRequest::get()
            .uri("/api/public/invitation/NOPE00")
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn test_closed_rsvp_is_forbidden() {
        let (state, _dir) = test_state().await;
        let app = test::init_service(test_app(state)).await;
        let login: Value = test::call_and_read_body_json(&app, login_request().to_request()).await;
        let auth = ("Authorization", bearer(&login));

        let req = test::TestRequest::post()
            .uri("/api/invitation")
            .insert_header(V1)
            .insert_header(auth.clone())
            .set_json(json!({"guestName": "Ada", "code": "ADA001"}))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::put()
            .uri("/api/content/documents")
            .insert_header(V1)
            .insert_header(auth)
            .set_json(json!({
                "type": "rsvpSettings",
                "content": {"isOpen": true, "deadline": "2000-01-01T00:00:00Z"}
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/api/public/invitation/ADA001/rsvp")
            .set_json(json!({"attending": false}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );
    }

    #[actix_web::test]
    async fn test_gift_photo_and_registration() {
        let (state, dir) = test_state().await;
        let app = test::init_service(test_app(state)).await;

        let req = test::TestRequest::post()
            .uri("/api/public/register")
            .set_json(json!({"guestName": "Walk-in", "partySize": 2}))
            .to_request();
        let registered: Value = test::call_and_read_body_json(&app, req).await;
        let code = registered["data"]["code"].as_str().unwrap().to_string();
        assert_eq!(code.len(), 8);

        let req = test::TestRequest::put()
            .uri(&format!("/api/public/invitation/{code}/gift"))
            .to_request();
        let gifted: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(gifted["data"]["giftCompleted"], true);

        let (content_type, body) =
            multipart_body(&[], Some(("dance.jpg", "image/jpeg", b"\xff\xd8\xff\xe0jpeg")));
        let req = test::TestRequest::post()
            .uri(&format!("/api/public/invitation/{code}/photos"))
            .insert_header(("Content-Type", content_type))
            .set_payload(body)
            .to_request();
        let uploaded: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(uploaded["data"]["category"], "guest-photos");
        assert_eq!(uploaded["data"]["visible"], false);
        assert_eq!(uploaded["data"]["uploadedBy"], code.as_str());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

        let req = test::TestRequest::get().uri("/api/public/gallery").to_request();
        let gallery: Value = test::call_and_read_body_json(&app, req).await;
        assert!(gallery["data"].as_array().unwrap().is_empty());

        let req = test::TestRequest::get()
            .uri(&format!("/api/public/invitation/{code}"))
            .to_request();
        let opened: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(opened["data"]["photoCompleted"], true);
    }
}
