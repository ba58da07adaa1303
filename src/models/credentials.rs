//! Encrypted credential model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Ciphertext-only broker credentials for one user
///
/// Each field is independently nullable; a session-id-only record is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CredentialRecord {
    pub user_id: i64,
    pub login_enc: Option<String>,
    pub password_enc: Option<String>,
    pub ssid_enc: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// The login/password ciphertext pair, when both are stored
    pub fn login_pair(&self) -> Option<EncryptedLogin> {
        match (&self.login_enc, &self.password_enc) {
            (Some(login_enc), Some(password_enc)) if !login_enc.is_empty() && !password_enc.is_empty() => {
                Some(EncryptedLogin {
                    login_enc: login_enc.clone(),
                    password_enc: password_enc.clone(),
                })
            }
            _ => None,
        }
    }

    /// Whether the record carries enough to act on behalf of the user
    pub fn is_configured(&self) -> bool {
        self.login_pair().is_some() || self.ssid_enc.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Login/password ciphertext pair as relayed to the analysis core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedLogin {
    pub login_enc: String,
    pub password_enc: String,
}
