use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required(message = "username is required"))]
    pub username: Option<String>,
    #[validate(required(message = "password is required"))]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user_id: i32,
    pub username: String,
    pub display_name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub jti: String,
    pub sub: String,
    pub iss: String,
    pub exp: i64,
    pub nbf: i64,
    pub iat: i64,
    pub user_id: i32,
    pub username: String,
}

impl Claims {
    /// Claims valid from now for `expire_secs` seconds.
    pub fn new(iss: String, user_id: i32, username: String, expire_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            jti: Uuid::new_v4().to_string(),
            sub: user_id.to_string(),
            iss,
            exp: now + expire_secs,
            nbf: now,
            iat: now,
            user_id,
            username,
        }
    }

    /// Seconds left before `exp`, zero once expired.
    pub fn remaining_secs(&self) -> i64 {
        (self.exp - Utc::now().timestamp()).max(0)
    }
}
