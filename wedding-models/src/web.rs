use actix_web::body::EitherBody;
use actix_web::{HttpResponse, Responder};
use serde::Deserialize;
use serde::Serialize;

/// Response code
pub enum ResponseCode {
    Success = 0,
    Error = 500,
}

/// Envelope of every JSON API response
#[derive(Debug, Serialize, Deserialize)]
pub struct WebResponse<T> {
    pub code: u16,
    pub message: String,
    /// Payload, absent on errors and on empty successes
    pub data: Option<T>,
}

impl<T> WebResponse<T> {
    pub fn new(code: ResponseCode, message: &str, data: Option<T>) -> Self {
        Self {
            code: code as u16,
            message: message.into(),
            data,
        }
    }

    pub fn ok(data: T) -> Self {
        Self::new(ResponseCode::Success, "success", Some(data))
    }

    pub fn ok_with_message(message: &str, data: T) -> Self {
        Self::new(ResponseCode::Success, message, Some(data))
    }

    pub fn ok_empty() -> WebResponse<()> {
        WebResponse::new(ResponseCode::Success, "success", None)
    }

    pub fn error(message: &str) -> Self {
        Self::new(ResponseCode::Error, message, None)
    }
}

impl<T> Responder for WebResponse<T>
where
    T: Serialize,
{
    type Body = EitherBody<String>;

    fn respond_to(self, _req: &actix_web::HttpRequest) -> HttpResponse<EitherBody<String>> {
        match serde_json::to_string(&self) {
            Ok(body) => HttpResponse::Ok()
                .content_type("application/json")
                .body(body)
                .map_into_right_body(),
            Err(e) => HttpResponse::InternalServerError()
                .content_type("application/json")
                .body(serde_json::json!({"error": "internal", "message": e.to_string()}).to_string())
                .map_into_right_body(),
        }
    }
}
