use crate::{middleware::RequestContext, AppState};
use actix_web::web;
use actix_web_validator::Json;
use std::time::Duration;
use tracing::info;
use wedding_error::{web::WebError, WebResult};
use wedding_models::{
    cache::WedBaseCache,
    constants::BEARER_TOKEN,
    domain::prelude::{Claims, LoginRequest, LoginResponse},
    web::WebResponse,
};
use wedding_repository::AdminUserRepository;
use wedding_utils::{hash::bcrypt_check, jwt::encode_jwt};

pub(super) const ROUTER_PREFIX: &str = "/auth";

/// Configure authentication routes
///
/// # Routes
/// - POST `/logout`: revoke the current token
///
/// `POST /login` is registered with the public routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/logout", web::post().to(logout));
}

/// Login endpoint
///
/// # Endpoint
/// `POST /api/auth/login`
///
/// # Errors
/// - Unauthorized (401): unknown user or wrong password
pub async fn login(
    req: Json<LoginRequest>,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<LoginResponse>> {
    let username = req.username.as_deref().unwrap_or_default();
    let password = req.password.as_deref().unwrap_or_default();

    // same answer for unknown users and wrong passwords
    let user = AdminUserRepository::find_by_username(username, &state.db)
        .await?
        .ok_or(WebError::Unauthorized)?;
    if !bcrypt_check(password, &user.password) {
        return Err(WebError::Unauthorized);
    }

    let jwt = &state.settings.web.jwt;
    let expires_in = jwt.expire / 1000;
    let claims = Claims::new(
        jwt.issuer.clone(),
        user.id,
        user.username.clone(),
        expires_in,
    );
    let token = encode_jwt(&claims, jwt.secret.as_bytes(), None)
        .map_err(|_| WebError::InternalError("Failed to encode JWT".to_string()))?;

    info!(user = %user.username, "Admin logged in");
    Ok(WebResponse::ok(LoginResponse {
        token,
        token_type: BEARER_TOKEN.to_string(),
        expires_in,
        user_id: user.id,
        username: user.username,
        display_name: user.display_name,
    }))
}

/// Logout endpoint
///
/// # Endpoint
/// `POST /api/auth/logout`
///
/// # Description
/// Revokes the presented token until it would have expired anyway.
async fn logout(
    ctx: RequestContext,
    state: web::Data<AppState>,
) -> WebResult<WebResponse<bool>> {
    let claims = ctx.grant.ok_or(WebError::Unauthorized)?;
    let remaining = claims.remaining_secs();
    if remaining > 0 {
        state
            .jwt_blacklist
            .set_with_ttl(claims.jti, (), Duration::from_secs(remaining as u64))
            .await?;
    }
    info!(user = %claims.username, "Admin logged out");
    Ok(WebResponse::ok(true))
}

#[cfg(test)]
mod tests {
    use crate::testing::{bearer, login_request, test_app, test_state, V1};
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_login_rejects_bad_credentials() {
        let (state, _dir) = test_state().await;
        let app = test::init_service(test_app(state)).await;

        for body in [
            json!({"username": "admin", "password": "wrong"}),
            json!({"username": "ghost", "password": "admin"}),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(body)
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        }

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"username": "admin"}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_logout_revokes_token() {
        let (state, _dir) = test_state().await;
        let app = test::init_service(test_app(state)).await;

        let login: Value = test::call_and_read_body_json(&app, login_request().to_request()).await;
        assert_eq!(login["data"]["tokenType"], "Bearer");
        assert!(login["data"]["expiresIn"].as_i64().unwrap() > 0);
        let token = bearer(&login);

        let stats = || {
            test::TestRequest::get()
                .uri("/api/dashboard/stats")
                .insert_header(V1)
                .insert_header(("Authorization", token.clone()))
                .to_request()
        };
        assert_eq!(test::call_service(&app, stats()).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/api/auth/logout")
            .insert_header(V1)
            .insert_header(("Authorization", token.clone()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        assert_eq!(
            test::call_service(&app, stats()).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
