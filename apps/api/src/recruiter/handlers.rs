//! Recruiter demo login: signs a visitor into a shared demo account without
//! a password, gated by a shared secret in the query string.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::info;

use crate::auth::handlers::start_session;
use crate::auth::password::{generate_unusable_password, hash_password};
use crate::errors::AppError;
use crate::models::user::{NewUser, UserRow};
use crate::state::AppState;

const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Deserialize)]
pub struct RecruiterQuery {
    #[serde(default)]
    pub key: String,
}

fn not_configured() -> AppError {
    AppError::NotImplemented("Recruiter access is not configured.".to_string())
}

/// GET /recruiter?key=
pub async fn handle_recruiter_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<RecruiterQuery>,
) -> Result<(CookieJar, Redirect), AppError> {
    let access_key = state
        .config
        .recruiter
        .access_key
        .as_deref()
        .ok_or_else(not_configured)?;

    if !keys_match(&query.key, access_key) {
        return Err(AppError::Forbidden("Invalid access key.".to_string()));
    }

    let user = ensure_demo_user(&state).await?;
    let (jar, _) = start_session(&state, jar, &user)?;
    info!("Recruiter session started for demo user {}", user.username);

    Ok((jar, Redirect::to(DASHBOARD_PATH)))
}

/// Constant-time key comparison over fixed-length SHA-256 digests.
fn keys_match(provided: &str, expected: &str) -> bool {
    if provided.is_empty() {
        return false;
    }
    let provided = Sha256::digest(provided.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    provided.as_slice().ct_eq(expected.as_slice()).into()
}

/// GET /recruiter-start
///
/// Forwards to `/recruiter` with the configured key so a single shareable
/// link works without exposing the key in it.
pub async fn handle_recruiter_start(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let access_key = state
        .config
        .recruiter
        .access_key
        .as_deref()
        .ok_or_else(not_configured)?;

    let mut url = reqwest::Url::parse("http://localhost/recruiter")
        .map_err(|e| AppError::Internal(e.into()))?;
    url.query_pairs_mut().append_pair("key", access_key);
    let target = format!("{}?{}", url.path(), url.query().unwrap_or_default());

    Ok(Redirect::to(&target))
}

/// Finds or creates the demo account. It is always verified and never has a
/// known password.
async fn ensure_demo_user(state: &AppState) -> Result<UserRow, AppError> {
    let recruiter = &state.config.recruiter;

    if let Some(user) = state
        .store
        .find_user_by_username(&recruiter.demo_username)
        .await?
    {
        if !user.is_verified {
            state.store.mark_verified(user.id).await?;
            return state
                .store
                .find_user_by_id(user.id)
                .await?
                .ok_or_else(|| AppError::NotFound("User not found".to_string()));
        }
        return Ok(user);
    }

    let password_hash = hash_password(&generate_unusable_password())?;
    let user = state
        .store
        .create_user(NewUser {
            username: recruiter.demo_username.clone(),
            email: recruiter.demo_email.trim().to_lowercase(),
            password_hash,
            verify_code: "000000".to_string(),
            verify_code_expiry: Utc::now(),
            is_verified: true,
            is_accept_message: true,
        })
        .await?;

    info!("Created recruiter demo user {}", user.username);
    Ok(user)
}
