//! Internationalization module
//!
//! This module handles multi-language support for the UI bot: embedded
//! translation tables, nested dotted keys and `{param}` substitution.

pub mod loader;

// Re-export commonly used i18n components
pub use loader::{I18n, TranslationParams, TranslationStats, params};
