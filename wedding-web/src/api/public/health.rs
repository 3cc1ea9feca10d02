use actix_web::{web, HttpResponse};

pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

#[cfg(test)]
mod tests {
    use crate::testing::{test_app, test_state};
    use actix_web::test;

    #[actix_web::test]
    async fn test_health_needs_no_token() {
        let (state, _dir) = test_state().await;
        let app = test::init_service(test_app(state)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "OK");
    }
}
