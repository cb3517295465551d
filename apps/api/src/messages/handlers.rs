//! Axum route handlers for a user's inbox: the acceptance flag, listing,
//! deletion, and the anonymous send path behind the public profile link.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::models::api::ApiMessage;
use crate::models::message::MessageRow;
use crate::models::user::{PublicProfile, UserRow};
use crate::state::AppState;
use crate::validation::{check_message_content, FieldErrors};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptMessagesRequest {
    pub accept_messages: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptMessagesResponse {
    pub success: bool,
    pub message: String,
    pub is_accepting_messages: bool,
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub success: bool,
    pub message: String,
    pub messages: Vec<MessageRow>,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub username: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub message: String,
    pub profile: PublicProfile,
}

async fn current_user(state: &AppState, auth: &AuthUser) -> Result<UserRow, AppError> {
    state
        .store
        .find_user_by_id(auth.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/accept-message
pub async fn handle_get_accept_messages(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<AcceptMessagesResponse>, AppError> {
    let user = current_user(&state, &auth).await?;
    Ok(Json(AcceptMessagesResponse {
        success: true,
        message: "Message acceptance status retrieved".to_string(),
        is_accepting_messages: user.is_accept_message,
    }))
}

/// POST /api/accept-message
///
/// Idempotent: setting the same value twice leaves the flag unchanged.
pub async fn handle_set_accept_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<AcceptMessagesRequest>,
) -> Result<Json<AcceptMessagesResponse>, AppError> {
    let user = state
        .store
        .set_accept_messages(auth.id, req.accept_messages)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    info!(
        "User {} now {} messages",
        user.username,
        if user.is_accept_message { "accepts" } else { "rejects" }
    );

    Ok(Json(AcceptMessagesResponse {
        success: true,
        message: "Message acceptance status updated successfully".to_string(),
        is_accepting_messages: user.is_accept_message,
    }))
}

/// GET /api/get-message
pub async fn handle_get_messages(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MessagesResponse>, AppError> {
    let user = current_user(&state, &auth).await?;
    let messages = state.store.list_messages(user.id).await?;
    Ok(Json(MessagesResponse {
        success: true,
        message: format!("{} message(s)", messages.len()),
        messages,
    }))
}

/// DELETE /api/delete-message/:messageid
///
/// Only the session user's own messages can be removed; anything else is 404.
pub async fn handle_delete_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(message_id): Path<String>,
) -> Result<Json<ApiMessage>, AppError> {
    let not_found = || AppError::NotFound("Message not found or already deleted".to_string());

    // An id that cannot exist is reported like one that no longer does.
    let message_id = Uuid::parse_str(&message_id).map_err(|_| not_found())?;
    if !state.store.delete_message(auth.id, message_id).await? {
        return Err(not_found());
    }

    info!("User {} deleted message {message_id}", auth.username);
    Ok(Json(ApiMessage::ok("Message deleted")))
}

/// POST /api/send-message
///
/// Anonymous: no session required. The recipient must be verified and
/// accepting messages.
pub async fn handle_send_message(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<ApiMessage>), AppError> {
    let content = req.content.trim();
    let mut errors = FieldErrors::default();
    check_message_content(&mut errors, content);
    errors.into_result()?;

    let recipient = state
        .store
        .find_user_by_username(req.username.trim())
        .await?
        .filter(|u| u.is_verified)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !recipient.is_accept_message {
        return Err(AppError::Forbidden(
            "User is not accepting messages".to_string(),
        ));
    }

    state.store.append_message(recipient.id, content).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiMessage::ok("Message sent successfully")),
    ))
}

/// GET /api/u/:username
pub async fn handle_public_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = state
        .store
        .find_user_by_username(&username)
        .await?
        .filter(|u| u.is_verified)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(ProfileResponse {
        success: true,
        message: "Profile found".to_string(),
        profile: user.public_profile(),
    }))
}
