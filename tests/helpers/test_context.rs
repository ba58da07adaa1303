//! Test context for unified test setup
//!
//! This module provides a unified test context that initializes all necessary
//! components: an in-memory database with migrations applied, the service
//! factory, and recording fakes behind every outbound seam.

use std::sync::Arc;

use signal_ui_bot::config::Settings;
use signal_ui_bot::database::{create_pool, run_migrations, DatabaseService};
use signal_ui_bot::i18n::I18n;
use signal_ui_bot::models::{CurrentScreen, NavStack, UserProfile};
use signal_ui_bot::services::crypto::generate_key;
use signal_ui_bot::services::signal::WorkSink;
use signal_ui_bot::services::{CryptoPaymentStub, ServiceFactory};
use signal_ui_bot::state::AppContext;

use super::messenger_mock::{MockMessenger, RecordingSink, ScriptedPayments};
use super::test_data::ROOT_ADMIN_ID;

/// Configuration for test context
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Wire the recording sink; `false` leaves the sink unconfigured
    pub with_sink: bool,
    pub root_admin_id: Option<i64>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            with_sink: true,
            root_admin_id: Some(ROOT_ADMIN_ID),
        }
    }
}

/// Unified test context that manages all test components
pub struct TestContext {
    pub app: AppContext,
    pub messenger: Arc<MockMessenger>,
    pub sink: Arc<RecordingSink>,
    pub payments: Arc<ScriptedPayments>,
    pub settings: Settings,
}

impl TestContext {
    /// Create a new test context with all components initialized
    pub async fn new() -> Self {
        Self::new_with_config(TestConfig::default()).await
    }

    /// Create a new test context with custom configuration
    pub async fn new_with_config(config: TestConfig) -> Self {
        // Initialize logging once
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let settings = create_test_settings(&config);

        let pool = create_pool(&settings.database).await.expect("Failed to create pool");
        run_migrations(&pool).await.expect("Failed to run migrations");
        let database = DatabaseService::new(pool);

        let sink = Arc::new(RecordingSink::new());
        let payments = Arc::new(ScriptedPayments::new(CryptoPaymentStub::new(&settings.payments)));
        let sink_seam = config.with_sink.then(|| sink.clone() as Arc<dyn WorkSink>);

        let factory = ServiceFactory::new(settings.clone(), database)
            .expect("Failed to create services")
            .with_signal_sink(sink_seam)
            .with_payment_provider(payments.clone());

        let i18n = I18n::new(&settings.i18n).expect("Failed to load translations");
        let messenger = Arc::new(MockMessenger::new());
        let app = AppContext::from_factory(factory, i18n, messenger.clone());

        Self {
            app,
            messenger,
            sink,
            payments,
            settings,
        }
    }

    pub async fn profile(&self, user_id: i64) -> UserProfile {
        self.app.database.get_profile(user_id).await.expect("Failed to load profile")
    }

    pub async fn current_screen(&self, user_id: i64) -> String {
        let current: CurrentScreen = self.app.database.load(user_id).await.expect("Failed to load screen");
        current.0
    }

    pub async fn nav_stack(&self, user_id: i64) -> Vec<String> {
        let stack: NavStack = self.app.database.load(user_id).await.expect("Failed to load stack");
        stack.entries().to_vec()
    }

    /// Translate a key in the default language
    pub fn t(&self, key: &str) -> String {
        self.app.i18n.t(key, "ru", None)
    }

    /// Send a callback through the router as if `user_id` clicked the live UI message
    pub async fn click(&self, user_id: i64, data: &str) {
        let clicked = self.profile(user_id).await.last_ui_message();
        signal_ui_bot::handlers::route_callback(&self.app, user_id, user_id, clicked, data)
            .await
            .expect("Callback failed");
    }

    pub async fn command(&self, user_id: i64, text: &str) {
        use teloxide::utils::command::BotCommands;
        let cmd = signal_ui_bot::handlers::Command::parse(text, "ui_bot").expect("Unknown command");
        signal_ui_bot::handlers::run_command(&self.app, user_id, user_id, None, cmd)
            .await
            .expect("Command failed");
    }

    pub async fn text(&self, user_id: i64, text: &str) {
        signal_ui_bot::handlers::handle_text(&self.app, user_id, user_id, None, text)
            .await
            .expect("Text handling failed");
    }
}

/// Create test-specific settings
pub fn create_test_settings(config: &TestConfig) -> Settings {
    let mut settings = Settings::default();

    settings.bot.token = "12345:test_token".to_string();
    settings.bot.root_admin_id = config.root_admin_id;

    // One connection keeps every query on the same in-memory database
    settings.database.url = "sqlite::memory:".to_string();
    settings.database.max_connections = 1;

    settings.security.encryption_key = generate_key();
    settings.logging.level = "debug".to_string();

    settings
}
