//! Error handling for the UI bot
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the UI bot
#[derive(Error, Debug)]
pub enum UiBotError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Unknown screen: {0}")]
    UnknownScreen(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Messaging gateway error: {0}")]
    Gateway(String),
}

/// Credential cipher errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("encryption key is not configured")]
    MissingKey,

    #[error("encryption key is malformed: {0}")]
    InvalidKey(String),

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decryption failed: wrong key or corrupted ciphertext")]
    DecryptionFailed,

    #[error("ciphertext is malformed: {0}")]
    MalformedCiphertext(String),
}

/// Result type alias for UI bot operations
pub type Result<T> = std::result::Result<T, UiBotError>;

/// Result type alias for cipher operations
pub type CryptoResult<T> = std::result::Result<T, CryptoError>;

impl UiBotError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            UiBotError::Database(_) => true,
            UiBotError::Migration(_) => false,
            UiBotError::Telegram(_) => true,
            UiBotError::Crypto(CryptoError::MissingKey) => false,
            UiBotError::Crypto(CryptoError::InvalidKey(_)) => false,
            UiBotError::Crypto(_) => true,
            UiBotError::Config(_) => false,
            UiBotError::PermissionDenied(_) => false,
            UiBotError::UnknownScreen(_) => false,
            UiBotError::Http(_) => true,
            UiBotError::Serialization(_) => false,
            UiBotError::Io(_) => true,
            UiBotError::UrlParse(_) => false,
            UiBotError::InvalidInput(_) => false,
            UiBotError::ServiceUnavailable(_) => true,
            UiBotError::Gateway(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            UiBotError::Migration(_) => ErrorSeverity::Critical,
            UiBotError::Config(_) => ErrorSeverity::Critical,
            UiBotError::Crypto(CryptoError::MissingKey) => ErrorSeverity::Critical,
            UiBotError::Crypto(CryptoError::InvalidKey(_)) => ErrorSeverity::Critical,
            UiBotError::PermissionDenied(_) => ErrorSeverity::Warning,
            UiBotError::UnknownScreen(_) => ErrorSeverity::Info,
            UiBotError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
