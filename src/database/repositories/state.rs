//! Keyed state repository implementation

use chrono::Utc;
use sqlx::SqlitePool;

use crate::utils::errors::UiBotError;

#[derive(Clone, Debug)]
pub struct StateRepository {
    pool: SqlitePool,
}

impl StateRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Raw JSON text stored under `(user_id, key)`
    pub async fn get(&self, user_id: i64, key: &str) -> Result<Option<String>, UiBotError> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM user_states WHERE user_id = ?1 AND key = ?2",
        )
        .bind(user_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    /// Insert or replace the value under `(user_id, key)`
    pub async fn set(&self, user_id: i64, key: &str, value: &str) -> Result<(), UiBotError> {
        sqlx::query(
            r#"
            INSERT INTO user_states (user_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, user_id: i64, key: &str) -> Result<(), UiBotError> {
        sqlx::query("DELETE FROM user_states WHERE user_id = ?1 AND key = ?2")
            .bind(user_id)
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
