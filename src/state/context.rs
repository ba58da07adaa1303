//! Application context
//!
//! Everything a handler needs, constructed once at startup and shared by
//! every update and API request.

use std::sync::Arc;

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::i18n::I18n;
use crate::services::{AuthService, CredentialCipher, Messenger, ServiceFactory};
use crate::state::navigation::NavigationEngine;

/// Application-wide context containing services and settings
#[derive(Clone)]
pub struct AppContext {
    pub settings: Settings,
    pub database: DatabaseService,
    pub auth_service: AuthService,
    pub cipher: CredentialCipher,
    pub services: Arc<ServiceFactory>,
    pub i18n: Arc<I18n>,
    pub messenger: Arc<dyn Messenger>,
    pub navigation: NavigationEngine,
}

impl AppContext {
    /// Create from ServiceFactory, translations and a messaging gateway
    pub fn from_factory(factory: ServiceFactory, i18n: I18n, messenger: Arc<dyn Messenger>) -> Self {
        let i18n = Arc::new(i18n);
        let navigation = NavigationEngine::new(
            factory.database.clone(),
            factory.auth_service.clone(),
            i18n.clone(),
            messenger.clone(),
        );

        Self {
            settings: factory.settings.clone(),
            database: factory.database.clone(),
            auth_service: factory.auth_service.clone(),
            cipher: factory.cipher.clone(),
            services: Arc::new(factory),
            i18n,
            messenger,
            navigation,
        }
    }
}
