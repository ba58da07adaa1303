//! Ciphertext credential repository implementation
//!
//! Writes merge at field level: storing a login/password pair never clears a
//! stored session id, and storing a session id never clears the pair.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::credentials::CredentialRecord;
use crate::utils::errors::UiBotError;

#[derive(Clone, Debug)]
pub struct CredentialRepository {
    pool: SqlitePool,
}

impl CredentialRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn upsert_login(&self, user_id: i64, login_enc: &str, password_enc: &str) -> Result<(), UiBotError> {
        sqlx::query(
            r#"
            INSERT INTO user_credentials (user_id, login_enc, password_enc, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id) DO UPDATE SET
                login_enc = excluded.login_enc,
                password_enc = excluded.password_enc,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(login_enc)
        .bind(password_enc)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn upsert_ssid(&self, user_id: i64, ssid_enc: &str) -> Result<(), UiBotError> {
        sqlx::query(
            r#"
            INSERT INTO user_credentials (user_id, ssid_enc, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                ssid_enc = excluded.ssid_enc,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(ssid_enc)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find(&self, user_id: i64) -> Result<Option<CredentialRecord>, UiBotError> {
        let record = sqlx::query_as::<_, CredentialRecord>(
            "SELECT user_id, login_enc, password_enc, ssid_enc, updated_at FROM user_credentials WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
