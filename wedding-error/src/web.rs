use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::{cms::CmsError, storage::StorageError, WedError};

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("BadRequest: `{0}`")]
    BadRequest(String),
    #[error("`{0}` not found")]
    NotFound(String),
    #[error("Forbidden: `{0}`")]
    Forbidden(String),
    #[error("InternalError: `{0}`")]
    InternalError(String),
    #[error("DBError: `{0}`")]
    StorageError(#[from] StorageError),
    #[error("MultipartError: `{0}`")]
    MultipartError(String),
    #[error("ContentError: `{0}`")]
    ContentError(#[from] CmsError),
}

impl From<std::io::Error> for WebError {
    fn from(e: std::io::Error) -> Self {
        WebError::InternalError(e.to_string())
    }
}

impl From<WedError> for WebError {
    fn from(e: WedError) -> Self {
        match e {
            WedError::StorageError(StorageError::EntityNotFound(msg)) => WebError::NotFound(msg),
            WedError::CmsError(e) => WebError::ContentError(e),
            WedError::WebError(e) => e,
            WedError::ValidationError(msg) => WebError::BadRequest(msg),
            other => WebError::InternalError(other.to_string()),
        }
    }
}

impl From<actix_multipart::MultipartError> for WebError {
    fn from(e: actix_multipart::MultipartError) -> Self {
        WebError::MultipartError(e.to_string())
    }
}

impl ResponseError for WebError {
    fn status_code(&self) -> StatusCode {
        match self {
            WebError::Unauthorized => StatusCode::UNAUTHORIZED,
            WebError::BadRequest(_) | WebError::MultipartError(_) => StatusCode::BAD_REQUEST,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Forbidden(_) => StatusCode::FORBIDDEN,
            WebError::StorageError(StorageError::EntityNotFound(_)) => StatusCode::NOT_FOUND,
            WebError::InternalError(_) | WebError::StorageError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            WebError::ContentError(CmsError::UnknownType(_))
            | WebError::ContentError(CmsError::DocumentNotFound(_)) => StatusCode::NOT_FOUND,
            WebError::ContentError(CmsError::SingletonDelete(_)) => StatusCode::FORBIDDEN,
            WebError::ContentError(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = json!({
            "message": self.to_string()
        });
        let label = match self {
            WebError::Unauthorized => "Unauthorized",
            WebError::BadRequest(_) => "Bad Request",
            WebError::NotFound(_) => "Not Found",
            WebError::Forbidden(_) => "Forbidden",
            WebError::InternalError(_) => "Internal Server Error",
            WebError::StorageError(StorageError::EntityNotFound(_)) => "Not Found",
            WebError::StorageError(_) => "Storage Error",
            WebError::MultipartError(msg) => {
                body["message"] = json!(msg);
                "Multipart Error"
            }
            WebError::ContentError(e) => {
                if let CmsError::Invalid(issues) = e {
                    body["issues"] = json!(issues);
                }
                "Content Error"
            }
        };
        body["error"] = json!(label);
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::ContentIssue;

    #[test]
    fn test_missing_entity_maps_to_not_found() {
        let err: WebError =
            WedError::StorageError(StorageError::EntityNotFound("guest 7".into())).into();
        assert!(matches!(err, WebError::NotFound(_)));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: WebError = WedError::ValidationError("code already taken".into()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_content_error_status() {
        let invalid = WebError::ContentError(CmsError::Invalid(vec![ContentIssue::new(
            "title",
            "required",
        )]));
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let singleton = WebError::ContentError(CmsError::SingletonDelete("siteSettings".into()));
        assert_eq!(singleton.status_code(), StatusCode::FORBIDDEN);

        let unknown = WebError::ContentError(CmsError::UnknownType("poster".into()));
        assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_errors_are_internal() {
        let err: WebError = WedError::Msg("boom".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
