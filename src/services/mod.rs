//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod crypto;
pub mod messenger;
pub mod payment;
pub mod signal;

// Re-export commonly used services
pub use auth::{AuthService, AuthContext, Permission};
pub use crypto::CredentialCipher;
pub use messenger::{Button, Keyboard, Messenger, TelegramMessenger};
pub use payment::{CryptoPaymentStub, PaymentProvider};
pub use signal::{Entitlement, PlanEntitlement, RequestType, SupabaseSink, WorkItem, WorkSink};

use std::sync::Arc;

use serde::Serialize;
use tracing::error;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub settings: Settings,
    pub database: DatabaseService,
    pub auth_service: AuthService,
    pub cipher: CredentialCipher,
    pub payments: Arc<dyn PaymentProvider>,
    pub signal_sink: Option<Arc<dyn WorkSink>>,
    pub entitlement: Arc<dyn Entitlement>,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: Settings, database: DatabaseService) -> Result<Self> {
        let auth_service = AuthService::new(database.clone(), settings.bot.root_admin_id);
        let cipher = CredentialCipher::new(&settings.security.encryption_key)?;
        let payments: Arc<dyn PaymentProvider> = Arc::new(CryptoPaymentStub::new(&settings.payments));
        let signal_sink = SupabaseSink::from_config(&settings.signals)?
            .map(|sink| Arc::new(sink) as Arc<dyn WorkSink>);

        Ok(Self {
            settings,
            database,
            auth_service,
            cipher,
            payments,
            signal_sink,
            entitlement: Arc::new(PlanEntitlement),
        })
    }

    pub fn with_signal_sink(mut self, sink: Option<Arc<dyn WorkSink>>) -> Self {
        self.signal_sink = sink;
        self
    }

    pub fn with_payment_provider(mut self, payments: Arc<dyn PaymentProvider>) -> Self {
        self.payments = payments;
        self
    }

    pub fn with_entitlement(mut self, entitlement: Arc<dyn Entitlement>) -> Self {
        self.entitlement = entitlement;
        self
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let signal_sink = match &self.signal_sink {
            None => SinkStatus::NotConfigured,
            Some(sink) => match sink.health_check().await {
                Ok(()) => SinkStatus::Connected,
                Err(e) => {
                    error!(error = %e, "Signal sink health check failed");
                    SinkStatus::Disconnected
                }
            },
        };

        let database = match self.database.health_check().await {
            Ok(()) => ComponentStatus::Enabled,
            Err(e) => {
                error!(error = %e, "Database health check failed");
                ComponentStatus::Unavailable
            }
        };

        ServiceHealthStatus {
            telegram_bot: if self.settings.bot.token.trim().is_empty() {
                ComponentStatus::NotConfigured
            } else {
                ComponentStatus::Configured
            },
            signal_sink,
            encryption: if self.settings.security.encryption_key.trim().is_empty() {
                ComponentStatus::NotConfigured
            } else {
                ComponentStatus::Enabled
            },
            database,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    Configured,
    NotConfigured,
    Enabled,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkStatus {
    NotConfigured,
    Connected,
    Disconnected,
}

/// Health status for all services
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealthStatus {
    pub telegram_bot: ComponentStatus,
    #[serde(rename = "supabase")]
    pub signal_sink: SinkStatus,
    pub encryption: ComponentStatus,
    #[serde(rename = "sqlite_db")]
    pub database: ComponentStatus,
}

impl ServiceHealthStatus {
    /// Check if all critical services are healthy
    pub fn is_healthy(&self) -> bool {
        self.database == ComponentStatus::Enabled && self.encryption == ComponentStatus::Enabled
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.telegram_bot != ComponentStatus::Configured {
            issues.push("Telegram bot token not configured".to_string());
        }
        if self.signal_sink == SinkStatus::Disconnected {
            issues.push("Signal sink unreachable".to_string());
        }
        if self.encryption != ComponentStatus::Enabled {
            issues.push("Encryption key not configured".to_string());
        }
        if self.database != ComponentStatus::Enabled {
            issues.push("Local database unavailable".to_string());
        }

        issues
    }
}
