//! Bearer token authentication for the admin routes.
//!
//! Valid tokens leave their [`Claims`] in the request extensions, where
//! handlers pick them up through [`super::RequestContext`].

use crate::AppState;
use actix_service::{Service, Transform};
use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    error::ErrorInternalServerError,
    http::{header::AUTHORIZATION, Method},
    web::Data,
    Error, HttpMessage, HttpResponse,
};
use futures::{
    future::{ok, LocalBoxFuture, Ready},
    FutureExt,
};
use jsonwebtoken::{Algorithm, Validation};
use std::{
    cell::RefCell,
    rc::Rc,
    task::{Context, Poll},
};
use tracing::debug;
use wedding_models::{
    cache::WedBaseCache, constants::BEARER_TOKEN, domain::prelude::Claims, web::WebResponse,
};
use wedding_utils::jwt::decode_jwt;

/// Authentication middleware factory.
pub struct Authentication;

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthenticationMiddleware {
            service: Rc::new(RefCell::new(service)),
        })
    }
}

/// Rejects requests without a valid, non-revoked bearer token.
pub struct AuthenticationMiddleware<S> {
    service: Rc<RefCell<S>>,
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = S::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        async move {
            if Method::OPTIONS == req.method() {
                return srv.call(req).await.map(|res| res.map_into_left_body());
            }

            let state = req
                .app_data::<Data<AppState>>()
                .cloned()
                .ok_or_else(|| ErrorInternalServerError("Application state not configured"))?;

            let Some(claims) = extract_bearer_token(&req).and_then(|token| verify(token, &state))
            else {
                return Ok(unauthorized(req));
            };

            let revoked = state
                .jwt_blacklist
                .exists(claims.jti.clone())
                .await
                .map_err(ErrorInternalServerError)?;
            if revoked {
                debug!(user = %claims.username, "Rejected revoked token");
                return Ok(unauthorized(req));
            }

            req.extensions_mut().insert(claims);
            srv.call(req).await.map(|res| res.map_into_left_body())
        }
        .boxed_local()
    }
}

fn unauthorized<B>(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
    req.into_response(
        HttpResponse::Unauthorized()
            .json(WebResponse::<()>::error("Invalid token, please login again")),
    )
    .map_into_right_body()
}

/// Extracts the bearer token from the `Authorization` header.
#[inline]
fn extract_bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_TOKEN)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Decodes the token with the configured secret and issuer.
fn verify(token: &str, state: &AppState) -> Option<Claims> {
    let jwt = &state.settings.web.jwt;
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;
    validation.set_issuer(&[&jwt.issuer]);
    decode_jwt::<Claims>(token, jwt.secret.as_bytes(), Some(validation))
        .ok()
        .map(|data| data.claims)
}
