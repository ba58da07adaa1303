//! User profile repository implementation

use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::user::{ProfileUpdate, UserProfile};
use crate::utils::errors::UiBotError;

const PROFILE_COLUMNS: &str = "user_id, language, currency, plan, is_admin, is_banned, last_ui_chat_id, last_ui_message_id, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a default profile if absent, otherwise touch `updated_at`
    pub async fn ensure(&self, user_id: i64) -> Result<UserProfile, UiBotError> {
        let now = Utc::now();
        let profile = sqlx::query_as::<_, UserProfile>(&format!(
            r#"
            INSERT INTO users (user_id, created_at, updated_at)
            VALUES (?1, ?2, ?2)
            ON CONFLICT(user_id) DO UPDATE SET updated_at = excluded.updated_at
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Find profile by user id
    pub async fn find(&self, user_id: i64) -> Result<Option<UserProfile>, UiBotError> {
        let profile = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {} FROM users WHERE user_id = ?1",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Apply an allow-listed partial update; fields left as `None` keep their value
    pub async fn update(&self, user_id: i64, update: &ProfileUpdate) -> Result<Option<UserProfile>, UiBotError> {
        let (chat_id, message_id) = match update.last_ui_message {
            Some(locator) => (Some(locator.chat_id), Some(locator.message_id)),
            None => (None, None),
        };

        let profile = sqlx::query_as::<_, UserProfile>(&format!(
            r#"
            UPDATE users
            SET language = COALESCE(?2, language),
                currency = COALESCE(?3, currency),
                plan = COALESCE(?4, plan),
                is_admin = COALESCE(?5, is_admin),
                is_banned = COALESCE(?6, is_banned),
                last_ui_chat_id = COALESCE(?7, last_ui_chat_id),
                last_ui_message_id = COALESCE(?8, last_ui_message_id),
                updated_at = ?9
            WHERE user_id = ?1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .bind(update.language)
        .bind(update.currency)
        .bind(update.plan)
        .bind(update.is_admin)
        .bind(update.is_banned)
        .bind(chat_id)
        .bind(message_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Ids of every user carrying the stored admin flag
    pub async fn list_admin_ids(&self) -> Result<Vec<i64>, UiBotError> {
        let ids = sqlx::query_scalar::<_, i64>("SELECT user_id FROM users WHERE is_admin = 1 ORDER BY user_id")
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64, UiBotError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
