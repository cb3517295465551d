use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::message::MessageRow;
use crate::models::user::{NewUser, UserRow};
use crate::store::{StoreError, UserStore};

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_user_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<UserRow>, StoreError> {
        Ok(sqlx::query_as::<_, UserRow>(
            "SELECT * FROM users WHERE username = $1 OR email = LOWER($1) LIMIT 1",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_user(&self, user: NewUser) -> Result<UserRow, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users
                (id, username, email, password_hash, verify_code, verify_code_expiry,
                 is_verified, is_accept_message)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.verify_code)
        .bind(user.verify_code_expiry)
        .bind(user.is_verified)
        .bind(user.is_accept_message)
        .fetch_one(&self.pool)
        .await?;

        info!("Created user {} ({})", row.username, row.id);
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
        sqlx::query(
            r#"
            UPDATE users
            SET username = $2, password_hash = $3, verify_code = $4,
                verify_code_expiry = $5, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(password_hash)
        .bind(verify_code)
        .bind(verify_code_expiry)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_verify_code(
        &self,
        id: Uuid,
        verify_code: &str,
        verify_code_expiry: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE users SET verify_code = $2, verify_code_expiry = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(verify_code)
        .bind(verify_code_expiry)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE users SET is_verified = TRUE, verify_code_expiry = NOW(), updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE users SET password_hash = $2, verify_code_expiry = NOW(), updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_accept_messages(
        &self,
        id: Uuid,
        accept: bool,
    ) -> Result<Option<UserRow>, StoreError> {
        Ok(sqlx::query_as::<_, UserRow>(
            "UPDATE users SET is_accept_message = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(accept)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn append_message(
        &self,
        user_id: Uuid,
        content: &str,
    ) -> Result<MessageRow, StoreError> {
        Ok(sqlx::query_as::<_, MessageRow>(
            "INSERT INTO messages (id, user_id, content) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_messages(&self, user_id: Uuid) -> Result<Vec<MessageRow>, StoreError> {
        Ok(sqlx::query_as::<_, MessageRow>(
            "SELECT * FROM messages WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete_message(&self, user_id: Uuid, message_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1 AND user_id = $2")
            .bind(message_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
