//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub signals: SignalSinkConfig,
    pub api: ApiConfig,
    pub payments: PaymentsConfig,
    pub i18n: I18nConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    /// Single super-admin. Only this exact id may manage other admins.
    pub root_admin_id: Option<i64>,
}

/// Local database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Credential encryption configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct SecurityConfig {
    /// Base64-encoded 32-byte key
    pub encryption_key: String,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("encryption_key", &if self.encryption_key.is_empty() { "<unset>" } else { "<redacted>" })
            .finish()
    }
}

/// External signal request sink (Supabase REST table)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignalSinkConfig {
    pub url: Option<String>,
    pub key: Option<String>,
    pub table: String,
    pub timeout_seconds: u64,
}

impl SignalSinkConfig {
    /// The sink is usable only when both the URL and the public key are set
    pub fn is_configured(&self) -> bool {
        matches!((&self.url, &self.key), (Some(url), Some(key)) if !url.is_empty() && !key.is_empty())
    }
}

/// Credential relay API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub allowed_sources: Vec<String>,
}

/// Subscription prices for the crypto payment stub
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentsConfig {
    pub asset: String,
    pub long_price: f64,
    pub short_price: f64,
    pub vip_price: f64,
    pub pay_url_base: String,
}

/// Internationalization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct I18nConfig {
    pub default_language: String,
    pub supported_languages: Vec<String>,
    /// Optional directory with `<lang>.json` files overriding the built-in ones
    pub translations_dir: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the daily rolling log file; stdout only when unset
    pub file_dir: Option<String>,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = Settings::default();

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&defaults)?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("UIBOT")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("api.allowed_sources")
                    .with_list_parse_key("i18n.supported_languages")
                    .try_parsing(true),
            )
            .set_override_option("bot.token", env("TELEGRAM_BOT_TOKEN_UI"))?
            .set_override_option("bot.root_admin_id", env("ADMIN_USER_ID").and_then(|v| v.parse::<i64>().ok()).filter(|id| *id != 0))?
            .set_override_option("security.encryption_key", env("ENCRYPTION_KEY"))?
            .set_override_option("signals.url", env("SUPABASE_URL"))?
            .set_override_option("signals.key", env("SUPABASE_KEY").or_else(|| env("NEXT_PUBLIC_SUPABASE_ANON_KEY")))?
            .set_override_option("api.port", env("PORT").and_then(|v| v.parse::<i64>().ok()))?
            .set_override_option("database.url", env("UI_BOT_DB_PATH").map(|path| format!("sqlite://{}", path)))?
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::UiBotError> {
        super::validation::validate_settings(self)
    }
}

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                root_admin_id: None,
            },
            database: DatabaseConfig {
                url: "sqlite://ui_bot.sqlite3".to_string(),
                max_connections: 5,
            },
            security: SecurityConfig {
                encryption_key: String::new(),
            },
            signals: SignalSinkConfig {
                url: None,
                key: None,
                table: "signal_requests".to_string(),
                timeout_seconds: 10,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                allowed_sources: vec![
                    "trading_core".to_string(),
                    "render_core".to_string(),
                    "admin".to_string(),
                ],
            },
            payments: PaymentsConfig {
                asset: "USDT".to_string(),
                long_price: 10.0,
                short_price: 10.0,
                vip_price: 25.0,
                pay_url_base: "https://crypto-payments.example/pay".to_string(),
            },
            i18n: I18nConfig {
                default_language: "ru".to_string(),
                supported_languages: vec!["ru".to_string(), "en".to_string()],
                translations_dir: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_dir: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.i18n.default_language, "ru");
        assert_eq!(settings.api.port, 8000);
        assert_eq!(settings.api.allowed_sources.len(), 3);
        assert!(!settings.signals.is_configured());
    }

    #[test]
    fn test_sink_requires_url_and_key() {
        let mut signals = Settings::default().signals;
        signals.url = Some("https://example.supabase.co".to_string());
        assert!(!signals.is_configured());
        signals.key = Some("anon".to_string());
        assert!(signals.is_configured());
        signals.key = Some(String::new());
        assert!(!signals.is_configured());
    }

    #[test]
    fn test_security_debug_redacts_key() {
        let security = SecurityConfig { encryption_key: "secret".to_string() };
        let printed = format!("{:?}", security);
        assert!(!printed.contains("secret"));
        assert!(printed.contains("<redacted>"));
    }
}
