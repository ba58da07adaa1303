//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured before the bot
//! starts serving traffic.

use crate::utils::errors::{UiBotError, Result};
use crate::services::crypto::CredentialCipher;
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_database_config(&settings.database)?;
    validate_security_config(&settings.security)?;
    validate_signal_sink_config(&settings.signals)?;
    validate_api_config(&settings.api)?;
    validate_payments_config(&settings.payments)?;
    validate_i18n_config(&settings.i18n)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(UiBotError::Config(
            "Bot token is required (TELEGRAM_BOT_TOKEN_UI)".to_string()
        ));
    }

    if let Some(id) = config.root_admin_id {
        if id <= 0 {
            return Err(UiBotError::Config(
                format!("Root admin id must be a positive user id, got {}", id)
            ));
        }
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(UiBotError::Config(
            "Database URL is required".to_string()
        ));
    }

    if !config.url.starts_with("sqlite:") {
        return Err(UiBotError::Config(
            format!("Only sqlite database URLs are supported, got {}", config.url)
        ));
    }

    if config.max_connections == 0 {
        return Err(UiBotError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate the encryption key: present and decodable to 32 bytes
fn validate_security_config(config: &super::SecurityConfig) -> Result<()> {
    CredentialCipher::new(&config.encryption_key)?;
    Ok(())
}

/// Validate the signal sink configuration
fn validate_signal_sink_config(config: &super::SignalSinkConfig) -> Result<()> {
    if let Some(url) = &config.url {
        if !url.is_empty() {
            url::Url::parse(url)?;
        }
    }

    if config.table.is_empty() {
        return Err(UiBotError::Config(
            "Signal request table name is required".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(UiBotError::Config(
            "Signal sink timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate relay API configuration
fn validate_api_config(config: &super::ApiConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(UiBotError::Config(
            "API host is required".to_string()
        ));
    }

    if config.allowed_sources.is_empty() {
        return Err(UiBotError::Config(
            "At least one allowed request source is required".to_string()
        ));
    }

    Ok(())
}

/// Validate subscription prices
fn validate_payments_config(config: &super::PaymentsConfig) -> Result<()> {
    for (plan, price) in [("long", config.long_price), ("short", config.short_price), ("vip", config.vip_price)] {
        if !(price > 0.0) {
            return Err(UiBotError::Config(
                format!("Price for plan {} must be positive", plan)
            ));
        }
    }

    if config.asset.is_empty() {
        return Err(UiBotError::Config(
            "Payment asset is required".to_string()
        ));
    }

    Ok(())
}

/// Validate internationalization configuration
fn validate_i18n_config(config: &super::I18nConfig) -> Result<()> {
    if config.default_language.is_empty() {
        return Err(UiBotError::Config(
            "Default language is required".to_string()
        ));
    }

    if config.supported_languages.is_empty() {
        return Err(UiBotError::Config(
            "At least one supported language is required".to_string()
        ));
    }

    if !config.supported_languages.contains(&config.default_language) {
        return Err(UiBotError::Config(
            "Default language must be in supported languages list".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(UiBotError::Config(
            "Log level is required".to_string()
        ));
    }

    Ok(())
}
