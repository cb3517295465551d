//! Credentials, session tokens, and the `AuthUser` extractor that maps a
//! session cookie (or bearer token) to the request context.

pub mod handlers;
pub mod password;
pub mod session;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

use self::session::{verify_session_token, SESSION_COOKIE};

/// The signed-in user. Rejects the request with 401 when no valid session is present.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .or_else(|| bearer_token(parts))
            .ok_or_else(AppError::not_authenticated)?;

        let claims = verify_session_token(&state.config.session_secret, &token)
            .map_err(|_| AppError::not_authenticated())?;

        Ok(AuthUser {
            id: claims.sub,
            username: claims.username,
        })
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}
