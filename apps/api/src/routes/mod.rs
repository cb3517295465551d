pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::messages::handlers as messages;
use crate::recruiter::handlers as recruiter;
use crate::state::AppState;
use crate::suggestions::handlers as suggestions;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/api/sign-up", post(auth::handle_sign_up))
        .route("/api/sign-in", post(auth::handle_sign_in))
        .route("/api/sign-out", post(auth::handle_sign_out))
        .route("/api/session", get(auth::handle_session))
        .route("/api/verify-code", post(auth::handle_verify_code))
        .route(
            "/api/check-username-unique",
            get(auth::handle_check_username_unique),
        )
        .route("/api/forgot-password", post(auth::handle_forgot_password))
        .route("/api/change-password", post(auth::handle_change_password))
        // Inbox
        .route(
            "/api/accept-message",
            get(messages::handle_get_accept_messages).post(messages::handle_set_accept_messages),
        )
        .route("/api/get-message", get(messages::handle_get_messages))
        .route(
            "/api/delete-message/:messageid",
            delete(messages::handle_delete_message),
        )
        .route("/api/send-message", post(messages::handle_send_message))
        .route("/api/u/:username", get(messages::handle_public_profile))
        // Suggestions
        .route(
            "/api/suggest-messages",
            post(suggestions::handle_suggest_messages),
        )
        // Recruiter demo
        .route("/recruiter", get(recruiter::handle_recruiter_login))
        .route("/recruiter-start", get(recruiter::handle_recruiter_start))
        .with_state(state)
}
