//! Signal UI Bot
//!
//! Telegram front end for a trading-signal service. This library provides
//! screen navigation with a single live interactive message per user, a local
//! SQLite store for profiles and encrypted broker credentials, subscription
//! payments, signal request submission, an admin panel and an HTTP relay that
//! hands credential ciphertext to internal services.

pub mod api;
pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod database;
pub mod state;
pub mod i18n;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{UiBotError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;
pub use state::{AppContext, NavigationEngine};
pub use i18n::I18n;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
