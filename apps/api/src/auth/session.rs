use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::user::UserRow;

pub const SESSION_COOKIE: &str = "session-token";
pub const SESSION_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub is_verified: bool,
    pub exp: usize,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to sign session token: {0}")]
    Sign(jsonwebtoken::errors::Error),

    #[error("invalid session token")]
    Invalid,
}

pub fn issue_session_token(secret: &str, user: &UserRow) -> Result<String, SessionError> {
    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        is_verified: user.is_verified,
        exp: (Utc::now() + Duration::days(SESSION_TTL_DAYS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(SessionError::Sign)
}

pub fn verify_session_token(secret: &str, token: &str) -> Result<Claims, SessionError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| SessionError::Invalid)
}

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(secure)
        .max_age(cookie::time::Duration::days(SESSION_TTL_DAYS))
        .build()
}

/// Removal counterpart of [`session_cookie`]; path must match for browsers to drop it.
pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
