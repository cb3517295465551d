//! In-memory `UserStore` used by handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::message::MessageRow;
use crate::models::user::{NewUser, UserRow};
use crate::store::{StoreError, UserStore};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<UserRow>>,
    messages: Mutex<Vec<MessageRow>>,
}

impl MemoryUserStore {
    fn update_user(&self, id: Uuid, f: impl FnOnce(&mut UserRow)) -> Option<UserRow> {
        let mut users = self.users.lock().unwrap();
        let user = users.iter_mut().find(|u| u.id == id)?;
        f(user);
        user.updated_at = Utc::now();
        Some(user.clone())
    }

    fn find(&self, pred: impl Fn(&UserRow) -> bool) -> Option<UserRow> {
        self.users.lock().unwrap().iter().find(|u| pred(u)).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRow>, StoreError> {
        Ok(self.find(|u| u.id == id))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRow>, StoreError> {
        Ok(self.find(|u| u.username == username))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError> {
        Ok(self.find(|u| u.email == email))
    }

    async fn find_user_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<UserRow>, StoreError> {
        let email = identifier.to_lowercase();
        Ok(self.find(|u| u.username == identifier || u.email == email))
    }

    async fn create_user(&self, user: NewUser) -> Result<UserRow, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::DuplicateUsername);
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let now = Utc::now();
        let row = UserRow {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            verify_code: user.verify_code,
            verify_code_expiry: user.verify_code_expiry,
            is_verified: user.is_verified,
            is_accept_message: user.is_accept_message,
            created_at: now,
            updated_at: now,
        };
        users.push(row.clone());
        Ok(row)
    }

    async fn reissue_registration(
        &self,
        id: Uuid,
        username: &str,
        password_hash: &str,
        verify_code: &str,
        verify_code_expiry: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.update_user(id, |u| {
            u.username = username.to_string();
            u.password_hash = password_hash.to_string();
            u.verify_code = verify_code.to_string();
            u.verify_code_expiry = verify_code_expiry;
        });
        Ok(())
    }

    async fn set_verify_code(
        &self,
        id: Uuid,
        verify_code: &str,
        verify_code_expiry: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.update_user(id, |u| {
            u.verify_code = verify_code.to_string();
            u.verify_code_expiry = verify_code_expiry;
        });
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), StoreError> {
        self.update_user(id, |u| {
            u.is_verified = true;
            u.verify_code_expiry = Utc::now();
        });
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), StoreError> {
        self.update_user(id, |u| {
            u.password_hash = password_hash.to_string();
            u.verify_code_expiry = Utc::now();
        });
        Ok(())
    }

    async fn set_accept_messages(
        &self,
        id: Uuid,
        accept: bool,
    ) -> Result<Option<UserRow>, StoreError> {
        Ok(self.update_user(id, |u| u.is_accept_message = accept))
    }

    async fn append_message(
        &self,
        user_id: Uuid,
        content: &str,
    ) -> Result<MessageRow, StoreError> {
        let row = MessageRow {
            id: Uuid::new_v4(),
            user_id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.messages.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list_messages(&self, user_id: Uuid) -> Result<Vec<MessageRow>, StoreError> {
        let mut rows: Vec<MessageRow> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn delete_message(&self, user_id: Uuid, message_id: Uuid) -> Result<bool, StoreError> {
        let mut messages = self.messages.lock().unwrap();
        let before = messages.len();
        messages.retain(|m| !(m.id == message_id && m.user_id == user_id));
        Ok(messages.len() < before)
    }
}
