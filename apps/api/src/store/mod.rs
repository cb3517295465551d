//! Persistence seam. Handlers only ever talk to `dyn UserStore`;
//! `PgUserStore` is the production backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::message::MessageRow;
use crate::models::user::{NewUser, UserRow};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgUserStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already taken")]
    DuplicateUsername,

    #[error("email already registered")]
    DuplicateEmail,

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                match db.constraint() {
                    Some("users_username_key") => return StoreError::DuplicateUsername,
                    Some("users_email_key") => return StoreError::DuplicateEmail,
                    _ => {}
                }
            }
        }
        StoreError::Database(e)
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRow>, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRow>, StoreError>;

    /// `email` must already be normalized.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError>;

    /// Matches either the username or the (case-insensitive) email.
    async fn find_user_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<UserRow>, StoreError>;

    async fn create_user(&self, user: NewUser) -> Result<UserRow, StoreError>;

    /// Re-registration of a still-unverified account: new username,
    /// credentials and code.
    async fn reissue_registration(
        &self,
        id: Uuid,
        username: &str,
        password_hash: &str,
        verify_code: &str,
        verify_code_expiry: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn set_verify_code(
        &self,
        id: Uuid,
        verify_code: &str,
        verify_code_expiry: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Marks the account verified and burns the current code.
    async fn mark_verified(&self, id: Uuid) -> Result<(), StoreError>;

    /// Replaces the password hash and burns the current code.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), StoreError>;

    /// Returns the updated user, or `None` if it no longer exists.
    async fn set_accept_messages(
        &self,
        id: Uuid,
        accept: bool,
    ) -> Result<Option<UserRow>, StoreError>;

    async fn append_message(&self, user_id: Uuid, content: &str)
        -> Result<MessageRow, StoreError>;

    /// Newest first.
    async fn list_messages(&self, user_id: Uuid) -> Result<Vec<MessageRow>, StoreError>;

    /// Deletes one of `user_id`'s messages. `false` when nothing matched.
    async fn delete_message(&self, user_id: Uuid, message_id: Uuid) -> Result<bool, StoreError>;
}
