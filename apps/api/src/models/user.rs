use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Lifetime of a freshly issued verification or reset code.
pub fn verify_code_ttl() -> Duration {
    Duration::hours(1)
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub verify_code: String,
    pub verify_code_expiry: DateTime<Utc>,
    pub is_verified: bool,
    pub is_accept_message: bool,
    pub created_at: DateTime<Utc>,
    #[allow(dead_code)]
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    /// A code is valid only while unexpired and only if it matches exactly.
    pub fn is_code_valid(&self, code: &str, now: DateTime<Utc>) -> bool {
        self.verify_code == code && self.verify_code_expiry > now
    }

    pub fn is_code_expired(&self, now: DateTime<Utc>) -> bool {
        self.verify_code_expiry <= now
    }

    pub fn can_receive_messages(&self) -> bool {
        self.is_verified && self.is_accept_message
    }

    pub fn public_profile(&self) -> PublicProfile {
        PublicProfile {
            username: self.username.clone(),
            is_accepting_messages: self.can_receive_messages(),
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            is_verified: self.is_verified,
            is_accepting_messages: self.is_accept_message,
            created_at: self.created_at,
        }
    }
}

/// Insert payload for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub verify_code: String,
    pub verify_code_expiry: DateTime<Utc>,
    pub is_verified: bool,
    pub is_accept_message: bool,
}

/// What anyone holding the profile link may see.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub username: String,
    pub is_accepting_messages: bool,
}

/// The account as shown to its owner. Never carries credentials.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_verified: bool,
    pub is_accepting_messages: bool,
    pub created_at: DateTime<Utc>,
}
