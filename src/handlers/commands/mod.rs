//! Command handlers module
//!
//! This module contains handlers for all bot commands like /start, /help, etc.

pub mod admin;
pub mod credentials;
pub mod start;

use std::sync::Arc;

use teloxide::{Bot, types::Message, utils::command::BotCommands};
use tracing::debug;

use crate::models::MessageRef;
use crate::services::signal::RequestType;
use crate::state::screens;
use crate::state::AppContext;
use crate::utils::errors::{Result, UiBotError};

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "Available commands:")]
pub enum Command {
    #[command(description = "Home screen")]
    Start,
    #[command(description = "Main menu")]
    Menu,
    #[command(description = "Help")]
    Help,
    #[command(description = "Bank and subscription payments")]
    Bank,
    #[command(description = "My Long signals")]
    MyLongs,
    #[command(description = "My stats")]
    MyStats,
    #[command(description = "Plans")]
    Plans,
    #[command(description = "Settings")]
    Settings,
    #[command(description = "Store PO credentials: /set_po <login> <password>")]
    SetPo(String),
    #[command(description = "Store PO session id: /set_ssid <ssid>")]
    SetSsid(String),
    #[command(description = "Request the latest signal")]
    Signal,
    #[command(description = "Request a Long signal")]
    Long,
    #[command(description = "Request a Short signal")]
    Short,
    #[command(description = "Admin panel (admin only)")]
    Admin,
    #[command(description = "Ban a user (admin only)")]
    BanUser(String),
    #[command(description = "Unban a user (admin only)")]
    UnbanUser(String),
    #[command(description = "Grant admin rights (root admin only)")]
    AddAdmin(String),
    #[command(description = "Revoke admin rights (root admin only)")]
    RemoveAdmin(String),
    #[command(description = "Delete all data of a user (admin only)")]
    ResetUser(String),
}

/// Main command dispatcher
pub async fn handle_command(_bot: Bot, msg: Message, cmd: Command, ctx: Arc<AppContext>) -> Result<()> {
    let user = msg.from.as_ref().ok_or_else(|| {
        UiBotError::InvalidInput("No user in message".to_string())
    })?;

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id.0;
    debug!(user_id, chat_id, command = ?cmd, "Processing command");

    let incoming = MessageRef::new(chat_id, msg.id.0);
    run_command(&ctx, user_id, chat_id, Some(incoming), cmd).await
}

/// Execute a command on behalf of `user_id`
///
/// The command message itself is deleted best-effort to keep the chat clean.
pub async fn run_command(ctx: &AppContext, user_id: i64, chat_id: i64, incoming: Option<MessageRef>, cmd: Command) -> Result<()> {
    super::delete_incoming(ctx, incoming).await;

    let result = dispatch_command(ctx, user_id, chat_id, cmd).await;
    super::recover(ctx, user_id, chat_id, result).await
}

async fn dispatch_command(ctx: &AppContext, user_id: i64, chat_id: i64, cmd: Command) -> Result<()> {
    match cmd {
        Command::Start => start::handle_start(ctx, user_id, chat_id).await,
        Command::Menu => start::open_screen(ctx, user_id, chat_id, screens::MENU).await,
        Command::Help => start::open_screen(ctx, user_id, chat_id, screens::HELP).await,
        Command::Bank => start::open_screen(ctx, user_id, chat_id, screens::BANK).await,
        Command::MyLongs => start::open_screen(ctx, user_id, chat_id, screens::MY_LONGS).await,
        Command::MyStats => start::open_screen(ctx, user_id, chat_id, screens::MY_STATS).await,
        Command::Plans => start::open_screen(ctx, user_id, chat_id, screens::PLANS).await,
        Command::Settings => start::open_screen(ctx, user_id, chat_id, screens::SETTINGS).await,
        Command::SetPo(args) => credentials::handle_set_po(ctx, user_id, chat_id, &args).await,
        Command::SetSsid(args) => credentials::handle_set_ssid(ctx, user_id, chat_id, &args).await,
        Command::Signal => signal(ctx, user_id, chat_id, RequestType::LatestSignal).await,
        Command::Long => signal(ctx, user_id, chat_id, RequestType::Long).await,
        Command::Short => signal(ctx, user_id, chat_id, RequestType::Short).await,
        Command::Admin => admin::handle_admin_panel(ctx, user_id, chat_id).await,
        Command::BanUser(args) => admin::handle_admin_command(ctx, user_id, chat_id, admin::AdminCommand::Ban, &args).await,
        Command::UnbanUser(args) => admin::handle_admin_command(ctx, user_id, chat_id, admin::AdminCommand::Unban, &args).await,
        Command::AddAdmin(args) => admin::handle_admin_command(ctx, user_id, chat_id, admin::AdminCommand::AddAdmin, &args).await,
        Command::RemoveAdmin(args) => admin::handle_admin_command(ctx, user_id, chat_id, admin::AdminCommand::RemoveAdmin, &args).await,
        Command::ResetUser(args) => admin::handle_admin_command(ctx, user_id, chat_id, admin::AdminCommand::Reset, &args).await,
    }
}

async fn signal(ctx: &AppContext, user_id: i64, chat_id: i64, request_type: RequestType) -> Result<()> {
    crate::handlers::signal::request_signal(ctx, user_id, chat_id, request_type).await?;
    Ok(())
}
