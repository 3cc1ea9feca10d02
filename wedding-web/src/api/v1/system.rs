use actix_web::web;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::Level;
use wedding_common::WedAppContext;
use wedding_error::{web::WebError, WebResult};
use wedding_models::web::WebResponse;

pub(super) const ROUTER_PREFIX: &str = "/system";

/// # Routes
/// - GET `/log-level`: current level
/// - PUT `/log-level`: change it without a restart
pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/log-level", web::get().to(get_log_level))
        .route("/log-level", web::put().to(set_log_level));
}

#[derive(Debug, Deserialize, Serialize)]
struct LogLevelPayload {
    level: String,
}

fn parse_level(level: &str) -> WebResult<Level> {
    Level::from_str(level.trim())
        .map_err(|_| WebError::BadRequest(format!("unknown log level `{level}`")))
}

async fn get_log_level() -> WebResult<WebResponse<LogLevelPayload>> {
    let ctx = WedAppContext::instance().await?;
    Ok(WebResponse::ok(LogLevelPayload {
        level: ctx.log_level().to_string().to_lowercase(),
    }))
}

/// # Errors
/// - Bad Request (400): not one of trace, debug, info, warn, error
async fn set_log_level(
    payload: web::Json<LogLevelPayload>,
) -> WebResult<WebResponse<LogLevelPayload>> {
    let level = parse_level(&payload.level)?;
    WedAppContext::instance().await?.change_log_level(level)?;
    Ok(WebResponse::ok(LogLevelPayload {
        level: level.to_string().to_lowercase(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bearer, login_request, test_app, test_state, V1};
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").unwrap(), Level::DEBUG);
        assert_eq!(parse_level(" WARN ").unwrap(), Level::WARN);
        assert!(parse_level("loud").is_err());
    }

    #[actix_web::test]
    async fn test_unknown_level_is_rejected_before_touching_context() {
        let (state, _dir) = test_state().await;
        let app = test::init_service(test_app(state)).await;
        let login: Value = test::call_and_read_body_json(&app, login_request().to_request()).await;

        let req = test::TestRequest::put()
            .uri("/api/system/log-level")
            .insert_header(V1)
            .insert_header(("Authorization", bearer(&login)))
            .set_json(json!({"level": "loud"}))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }
}
