//! Database service layer
//!
//! This module provides a high-level interface to database operations. It is
//! the local store every other component talks to: profiles, ciphertext
//! credentials and keyed per-user state.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::database::{DatabasePool, UserRepository, CredentialRepository, StateRepository};
use crate::models::*;
use crate::utils::errors::UiBotError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pool: DatabasePool,
    pub users: UserRepository,
    pub credentials: CredentialRepository,
    pub states: StateRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            credentials: CredentialRepository::new(pool.clone()),
            states: StateRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Create the default profile on first contact; touch it otherwise
    pub async fn ensure(&self, user_id: i64) -> Result<UserProfile, UiBotError> {
        self.users.ensure(user_id).await
    }

    pub async fn get_profile(&self, user_id: i64) -> Result<UserProfile, UiBotError> {
        self.users.ensure(user_id).await
    }

    /// Apply an allow-listed partial update. An empty update changes nothing.
    pub async fn update_profile(&self, user_id: i64, update: ProfileUpdate) -> Result<UserProfile, UiBotError> {
        let profile = self.users.ensure(user_id).await?;
        if update.is_empty() {
            return Ok(profile);
        }

        match self.users.update(user_id, &update).await? {
            Some(profile) => Ok(profile),
            // Raced with a reset; recreate the profile and apply again
            None => {
                self.users.ensure(user_id).await?;
                self.users
                    .update(user_id, &update)
                    .await?
                    .ok_or_else(|| UiBotError::ServiceUnavailable(format!("profile {} vanished during update", user_id)))
            }
        }
    }

    /// Stored value under `key`, or `default` when absent or unreadable
    pub async fn get_state<V: DeserializeOwned>(&self, user_id: i64, key: &str, default: V) -> Result<V, UiBotError> {
        let Some(raw) = self.states.get(user_id, key).await? else {
            return Ok(default);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(user_id, key, error = %e, "Discarding unreadable state entry");
                Ok(default)
            }
        }
    }

    pub async fn set_state<V: Serialize + ?Sized>(&self, user_id: i64, key: &str, value: &V) -> Result<(), UiBotError> {
        let raw = serde_json::to_string(value)?;
        self.users.ensure(user_id).await?;
        self.states.set(user_id, key, &raw).await
    }

    pub async fn delete_state(&self, user_id: i64, key: &str) -> Result<(), UiBotError> {
        self.states.delete(user_id, key).await
    }

    /// Typed read of a state entry, falling back to its default
    pub async fn load<T: StateEntry>(&self, user_id: i64) -> Result<T, UiBotError> {
        self.get_state(user_id, T::KEY, T::default()).await
    }

    pub async fn save<T: StateEntry>(&self, user_id: i64, value: &T) -> Result<(), UiBotError> {
        self.set_state(user_id, T::KEY, value).await
    }

    pub async fn clear<T: StateEntry>(&self, user_id: i64) -> Result<(), UiBotError> {
        self.delete_state(user_id, T::KEY).await
    }

    /// Store the login/password ciphertext pair, keeping any stored session id
    pub async fn save_credentials(&self, user_id: i64, login_enc: &str, password_enc: &str) -> Result<(), UiBotError> {
        self.users.ensure(user_id).await?;
        self.credentials.upsert_login(user_id, login_enc, password_enc).await?;
        debug!(user_id, "Stored login credentials");
        Ok(())
    }

    /// Store the session-id ciphertext, keeping any stored login/password
    pub async fn save_ssid(&self, user_id: i64, ssid_enc: &str) -> Result<(), UiBotError> {
        self.users.ensure(user_id).await?;
        self.credentials.upsert_ssid(user_id, ssid_enc).await?;
        debug!(user_id, "Stored session id");
        Ok(())
    }

    pub async fn get_credentials(&self, user_id: i64) -> Result<Option<CredentialRecord>, UiBotError> {
        self.credentials.find(user_id).await
    }

    pub async fn get_ssid(&self, user_id: i64) -> Result<Option<String>, UiBotError> {
        Ok(self
            .credentials
            .find(user_id)
            .await?
            .and_then(|record| record.ssid_enc)
            .filter(|ssid| !ssid.is_empty()))
    }

    /// Delete state entries, credentials and the profile, in that order
    pub async fn reset(&self, user_id: i64) -> Result<(), UiBotError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM user_states WHERE user_id = ?1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM user_credentials WHERE user_id = ?1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM users WHERE user_id = ?1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(user_id, "User data reset");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), UiBotError> {
        super::connection::health_check(&self.pool).await
    }
}
