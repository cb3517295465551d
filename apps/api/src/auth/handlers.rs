//! Axum route handlers for registration, sign-in, email verification and
//! password recovery.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::password::{generate_verify_code, hash_password, verify_password};
use crate::auth::session::{expired_session_cookie, issue_session_token, session_cookie};
use crate::auth::AuthUser;
use crate::email::{send_password_reset_code, send_verification_code};
use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::models::api::ApiMessage;
use crate::models::user::{verify_code_ttl, NewUser, UserRow, UserSummary};
use crate::state::AppState;
use crate::validation::{
    check_email, check_password, check_username, check_verify_code, normalize_email,
    FieldErrors,
};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub user: UserSummary,
}

#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub username: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsernameUniqueResponse {
    pub success: bool,
    pub message: String,
    pub is_unique: bool,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse {
    pub success: bool,
    pub message: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub email: String,
    pub code: String,
    pub password: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/sign-up
///
/// Creates an unverified account, or re-issues the pending registration when
/// the email belongs to an account that never completed verification.
/// A failed verification email never fails the registration itself.
pub async fn handle_sign_up(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignUpRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>), AppError> {
    let username = req.username.trim();
    let email = normalize_email(&req.email);

    let mut errors = FieldErrors::default();
    check_username(&mut errors, username);
    check_email(&mut errors, &email);
    check_password(&mut errors, &req.password);
    errors.into_result()?;

    if state.store.find_user_by_username(username).await?.is_some() {
        return Err(AppError::BadRequest("Username is already taken".to_string()));
    }

    let code = generate_verify_code();
    let expiry = Utc::now() + verify_code_ttl();
    let password_hash = hash_password(&req.password)?;

    match state.store.find_user_by_email(&email).await? {
        Some(existing) if existing.is_verified => {
            return Err(AppError::BadRequest(
                "A verified account already exists for this email".to_string(),
            ));
        }
        Some(existing) => {
            state
                .store
                .reissue_registration(existing.id, username, &password_hash, &code, expiry)
                .await?;
            info!("Re-issued pending registration {} as {username}", existing.id);
        }
        None => {
            state
                .store
                .create_user(NewUser {
                    username: username.to_string(),
                    email: email.clone(),
                    password_hash,
                    verify_code: code.clone(),
                    verify_code_expiry: expiry,
                    is_verified: false,
                    is_accept_message: true,
                })
                .await?;
        }
    }

    let response = match send_verification_code(state.mailer.as_ref(), &email, username, &code).await
    {
        Ok(_) => SignUpResponse {
            success: true,
            message: "User registered successfully. Please check your email for verification code."
                .to_string(),
            email_error: None,
        },
        Err(e) => {
            warn!("Verification email to {email} failed: {e}");
            SignUpResponse {
                success: true,
                message: "User registered successfully, but verification email failed to send. Please try again or contact support.".to_string(),
                email_error: Some(e.to_string()),
            }
        }
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/sign-in
///
/// Accepts a username or an email as the identifier and sets the session cookie.
pub async fn handle_sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<SignInRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), AppError> {
    let identifier = req.identifier.trim();

    let mut errors = FieldErrors::default();
    if identifier.is_empty() {
        errors.add("identifier", "Username or email is required");
    }
    if req.password.is_empty() {
        errors.add("password", "Password is required");
    }
    errors.into_result()?;

    let user = state
        .store
        .find_user_by_identifier(identifier)
        .await?
        .ok_or_else(|| {
            AppError::Unauthorized("No user found with this email or username".to_string())
        })?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(AppError::Unauthorized("Incorrect password".to_string()));
    }
    if !user.is_verified {
        return Err(AppError::Forbidden(
            "Please verify your account first before login".to_string(),
        ));
    }

    let (jar, token) = start_session(&state, jar, &user)?;
    info!("User {} signed in", user.username);

    Ok((
        jar,
        Json(SessionResponse {
            success: true,
            message: "Signed in successfully".to_string(),
            token: Some(token),
            user: user.summary(),
        }),
    ))
}

/// POST /api/sign-out
pub async fn handle_sign_out(jar: CookieJar) -> (CookieJar, Json<ApiMessage>) {
    (
        jar.remove(expired_session_cookie()),
        Json(ApiMessage::ok("Signed out")),
    )
}

/// GET /api/session
pub async fn handle_session(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<SessionResponse>, AppError> {
    let user = state
        .store
        .find_user_by_id(auth.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(SessionResponse {
        success: true,
        message: "Session is active".to_string(),
        token: None,
        user: user.summary(),
    }))
}

/// POST /api/verify-code
pub async fn handle_verify_code(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<VerifyCodeRequest>,
) -> Result<Json<ApiMessage>, AppError> {
    let code = req.code.trim();
    let mut errors = FieldErrors::default();
    check_verify_code(&mut errors, code);
    errors.into_result()?;

    let user = state
        .store
        .find_user_by_username(req.username.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if user.is_verified {
        return Ok(Json(ApiMessage::ok("Account is already verified")));
    }

    check_code(&user, code, "Verification code has expired. Please sign up again to get a new code.")?;
    state.store.mark_verified(user.id).await?;
    info!("User {} verified", user.username);

    Ok(Json(ApiMessage::ok("Account verified successfully")))
}

/// GET /api/check-username-unique?username=
pub async fn handle_check_username_unique(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> Result<Json<UsernameUniqueResponse>, AppError> {
    let username = query.username.trim();
    let mut errors = FieldErrors::default();
    check_username(&mut errors, username);
    errors.into_result()?;

    let is_unique = state.store.find_user_by_username(username).await?.is_none();
    Ok(Json(UsernameUniqueResponse {
        success: true,
        message: if is_unique {
            "Username is available".to_string()
        } else {
            "Username is already taken".to_string()
        },
        is_unique,
    }))
}

/// POST /api/forgot-password
///
/// Issues a fresh one-hour code and emails it.
pub async fn handle_forgot_password(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ForgotPasswordRequest>,
) -> Result<Json<ForgotPasswordResponse>, AppError> {
    let email = normalize_email(&req.email);
    let mut errors = FieldErrors::default();
    check_email(&mut errors, &email);
    errors.into_result()?;

    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("No account found with this email".to_string()))?;

    let code = generate_verify_code();
    state
        .store
        .set_verify_code(user.id, &code, Utc::now() + verify_code_ttl())
        .await?;

    send_password_reset_code(state.mailer.as_ref(), &email, &user.username, &code)
        .await
        .map_err(|e| AppError::Email(e.to_string()))?;

    Ok(Json(ForgotPasswordResponse {
        success: true,
        message: "A reset code has been sent to your email".to_string(),
        email,
    }))
}

/// POST /api/change-password
pub async fn handle_change_password(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> Result<Json<ApiMessage>, AppError> {
    let email = normalize_email(&req.email);
    let code = req.code.trim();

    let mut errors = FieldErrors::default();
    check_email(&mut errors, &email);
    check_verify_code(&mut errors, code);
    check_password(&mut errors, &req.password);
    errors.into_result()?;

    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("No account found with this email".to_string()))?;

    check_code(&user, code, "Reset code has expired. Please request a new one.")?;

    let password_hash = hash_password(&req.password)?;
    state.store.update_password(user.id, &password_hash).await?;
    info!("User {} changed password", user.username);

    Ok(Json(ApiMessage::ok("Password updated successfully")))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn check_code(user: &UserRow, code: &str, expired_message: &str) -> Result<(), AppError> {
    let now = Utc::now();
    if user.is_code_valid(code, now) {
        Ok(())
    } else if user.is_code_expired(now) {
        Err(AppError::BadRequest(expired_message.to_string()))
    } else {
        Err(AppError::BadRequest("Incorrect verification code".to_string()))
    }
}

/// Mints a session token for `user` and adds the session cookie to `jar`.
pub fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: &UserRow,
) -> Result<(CookieJar, String), AppError> {
    let token = issue_session_token(&state.config.session_secret, user)
        .map_err(|e| AppError::Internal(e.into()))?;
    let jar = jar.add(session_cookie(token.clone(), state.config.secure_cookies));
    Ok((jar, token))
}
