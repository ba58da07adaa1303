//! Signal UI Bot
//!
//! Main application entry point

use std::sync::Arc;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::UpdateHandler;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn, error};

use signal_ui_bot::{
    api::{self, ApiState},
    config::Settings,
    utils::logging,
    database::{DatabaseService, connection::{create_pool, run_migrations}},
    services::{ServiceFactory, TelegramMessenger, Messenger},
    state::AppContext,
    i18n::I18n,
    handlers::{
        Command,
        handle_command,
        handle_callback_query,
        handle_message,
    },
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", signal_ui_bot::info());

    // Initialize database connection
    info!("Opening local database...");
    let db_pool = create_pool(&settings.database).await?;

    // Run database migrations
    info!("Running database migrations...");
    run_migrations(&db_pool).await?;

    let database_service = DatabaseService::new(db_pool);

    // Initialize i18n system
    info!("Loading translations...");
    let mut i18n = I18n::new(&settings.i18n)?;
    if let Some(dir) = &settings.i18n.translations_dir {
        i18n.load_overrides(dir).await?;
    }
    let stats = i18n.get_stats();
    info!(default_language = %stats.default_language, languages = ?stats.languages, "Translations loaded");

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(settings.clone(), database_service)?;

    let health = services.health_check().await;
    if !health.is_healthy() {
        for issue in health.get_issues() {
            warn!(issue = %issue, "Service health issue");
        }
    }

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);
    let messenger: Arc<dyn Messenger> = Arc::new(TelegramMessenger::new(bot.clone()));
    let ctx = Arc::new(AppContext::from_factory(services, i18n, messenger));

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    // The relay API runs alongside the dispatcher
    let api_state = ApiState::new(ctx.services.clone());
    let api_config = settings.api.clone();
    let api_task = tokio::spawn(async move {
        if let Err(e) = api::serve(&api_config, api_state).await {
            error!(error = %e, "Relay API stopped");
        }
    });

    // Create the handler
    let handler = create_handler();

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.kind);
        })
        .enable_ctrlc_handler()
        .build();

    info!("Starting bot with polling mode...");
    dispatcher.dispatch().await;

    api_task.abort();
    info!("Signal UI bot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry()
        .branch(Update::filter_message()
            .branch(
                // Handle commands
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint(handle_commands)
            )
            .branch(
                // Handle free text
                dptree::filter(|msg: Message| msg.text().is_some())
                    .endpoint(handle_messages)
            )
        )
        .branch(
            // Handle callback queries
            Update::filter_callback_query()
                .endpoint(handle_callbacks)
        )
}

/// Handle bot commands
async fn handle_commands(bot: Bot, msg: Message, cmd: Command, ctx: Arc<AppContext>) -> HandlerResult {
    if let Err(e) = handle_command(bot, msg, cmd, ctx).await {
        error!(error = %e, severity = %e.severity(), recoverable = e.is_recoverable(), "Error handling command");
        return Err(e.into());
    }
    Ok(())
}

/// Handle regular messages
async fn handle_messages(bot: Bot, msg: Message, ctx: Arc<AppContext>) -> HandlerResult {
    if let Err(e) = handle_message(bot, msg, ctx).await {
        error!(error = %e, severity = %e.severity(), recoverable = e.is_recoverable(), "Error handling message");
        return Err(e.into());
    }
    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(bot: Bot, query: CallbackQuery, ctx: Arc<AppContext>) -> HandlerResult {
    let user_id = query.from.id.0 as i64;
    if let Err(e) = handle_callback_query(bot, query, ctx).await {
        error!(user_id, error = %e, severity = %e.severity(), recoverable = e.is_recoverable(), "Error handling callback query");
        return Err(e.into());
    }
    Ok(())
}
