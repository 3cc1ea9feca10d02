use crate::AppState;
use actix_web::web;
use wedding_error::WebResult;
use wedding_models::{
    domain::prelude::{DashboardStats, GuestStats, InvitationStats},
    web::WebResponse,
};
use wedding_repository::{
    ContentRepository, GuestRepository, InvitationRepository, MediaRepository, TimelineRepository,
};

pub(super) const ROUTER_PREFIX: &str = "/dashboard";

pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/stats", web::get().to(stats));
}

/// Totals shown on the admin landing page
///
/// # Endpoint
/// `GET /api/dashboard/stats`
async fn stats(state: web::Data<AppState>) -> WebResult<WebResponse<DashboardStats>> {
    let db = &state.db;
    let invitations = InvitationRepository::find_all(db).await?;
    let guests = GuestRepository::find_all(db).await?;
    Ok(WebResponse::ok(DashboardStats {
        invitations: InvitationStats::from_records(&invitations),
        guests: GuestStats::from_records(&guests),
        media: MediaRepository::count(db).await?,
        timeline_events: TimelineRepository::count(db).await?,
        content_documents: ContentRepository::count(db).await?,
    }))
}

#[cfg(test)]
mod tests {
    use crate::testing::{bearer, login_request, test_app, test_state, V1};
    use actix_web::test;
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_dashboard_aggregates_every_area() {
        let (state, _dir) = test_state().await;
        let app = test::init_service(test_app(state)).await;
        let login: Value = test::call_and_read_body_json(&app, login_request().to_request()).await;
        let auth = ("Authorization", bearer(&login));

        for body in [
            json!({"guestName": "Ada", "partySize": 2}),
            json!({"guestName": "Bob"}),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/invitation")
                .insert_header(V1)
                .insert_header(auth.clone())
                .set_json(body)
                .to_request();
            test::call_service(&app, req).await;
        }
        let req = test::TestRequest::post()
            .uri("/api/guest")
            .insert_header(V1)
            .insert_header(auth.clone())
            .set_json(json!({"name": "Cleo", "attendance": "yes"}))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get()
            .uri("/api/dashboard/stats")
            .insert_header(V1)
            .insert_header(auth)
            .to_request();
        let stats: Value = test::call_and_read_body_json(&app, req).await;
        let data = &stats["data"];
        assert_eq!(data["invitations"]["total"], 2);
        assert_eq!(data["invitations"]["pending"], 2);
        assert_eq!(data["guests"]["confirmed"], 1);
        assert_eq!(data["media"], 0);
        assert_eq!(data["timelineEvents"], 0);
    }
}
