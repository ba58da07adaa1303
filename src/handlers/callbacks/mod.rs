//! Callback query handlers module
//!
//! This module contains handlers for all inline keyboard button callbacks.
//! Callback data is a namespaced action token such as `nav:menu` or
//! `plan:select:vip`, parsed into a [`CallbackAction`] before routing.

pub mod admin;
pub mod plans;
pub mod settings;

use std::str::FromStr;
use std::sync::Arc;

use teloxide::{Bot, types::CallbackQuery, prelude::*};
use tracing::{debug, warn};

use crate::handlers::commands::start::open_screen;
use crate::handlers::{delete_incoming, recover, reject_blocked};
use crate::models::{MessageRef, PoFlow};
use crate::services::messenger::Keyboard;
use crate::services::signal::RequestType;
use crate::state::AppContext;
use crate::utils::errors::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    Navigate(String),
    Back,
    Home,
    Signal,
    SetPo,
    SelectPlan(String),
    CheckPayment(String),
    SetLanguage(String),
    SetCurrency(String),
    AdminFlow(String),
    AdminGive(String),
}

impl FromStr for CallbackAction {
    type Err = String;

    fn from_str(data: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = data.splitn(3, ':').collect();
        let action = match parts.as_slice() {
            ["nav", "back"] => CallbackAction::Back,
            ["nav", "home"] => CallbackAction::Home,
            ["nav", screen] if !screen.is_empty() => CallbackAction::Navigate(screen.to_string()),
            ["action", "signal"] => CallbackAction::Signal,
            ["action", "set_po"] => CallbackAction::SetPo,
            ["plan", "select", plan] => CallbackAction::SelectPlan(plan.trim().to_lowercase()),
            ["plan", "check", payment_id] => CallbackAction::CheckPayment(payment_id.to_string()),
            ["set", "lang", code] => CallbackAction::SetLanguage(code.to_string()),
            ["set", "currency", code] => CallbackAction::SetCurrency(code.to_string()),
            ["admin", "flow", action] => CallbackAction::AdminFlow(action.trim().to_string()),
            ["admin", "give", plan] => CallbackAction::AdminGive(plan.trim().to_lowercase()),
            _ => return Err(format!("unknown callback data: {}", data)),
        };
        Ok(action)
    }
}

/// Main callback query dispatcher
pub async fn handle_callback_query(bot: Bot, query: CallbackQuery, ctx: Arc<AppContext>) -> Result<()> {
    let user_id = query.from.id.0 as i64;

    // Answer first to remove the loading state
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, callback_id = %query.id, "Failed to answer callback query");
    }

    let Some(data) = query.data.as_deref() else {
        return Ok(());
    };

    let clicked = query
        .message
        .as_ref()
        .map(|m| MessageRef::new(m.chat().id.0, m.id().0));
    let chat_id = clicked.map(|m| m.chat_id).unwrap_or(user_id);

    route_callback(&ctx, user_id, chat_id, clicked, data).await
}

/// Route a callback token on behalf of `user_id`
pub async fn route_callback(ctx: &AppContext, user_id: i64, chat_id: i64, clicked: Option<MessageRef>, data: &str) -> Result<()> {
    let result = dispatch_callback(ctx, user_id, chat_id, clicked, data).await;
    recover(ctx, user_id, chat_id, result).await
}

async fn dispatch_callback(ctx: &AppContext, user_id: i64, chat_id: i64, clicked: Option<MessageRef>, data: &str) -> Result<()> {
    debug!(user_id, callback_data = %data, "Processing callback");

    let action = match data.parse::<CallbackAction>() {
        Ok(action) => action,
        Err(e) => {
            warn!(user_id, error = %e, "Ignoring callback");
            return Ok(());
        }
    };

    // A stale message that is not the live UI message would otherwise linger
    let profile = ctx.database.get_profile(user_id).await?;
    if clicked.is_some() && clicked != profile.last_ui_message() {
        delete_incoming(ctx, clicked).await;
    }

    match action {
        CallbackAction::Home => {
            ctx.navigation.home(user_id, chat_id).await?;
        }
        CallbackAction::Back => {
            ctx.navigation.back(user_id, chat_id).await?;
        }
        CallbackAction::Navigate(screen) => open_screen(ctx, user_id, chat_id, &screen).await?,
        CallbackAction::Signal => {
            crate::handlers::signal::request_signal(ctx, user_id, chat_id, RequestType::LatestSignal).await?;
        }
        CallbackAction::SetPo => start_po_flow(ctx, user_id, chat_id).await?,
        CallbackAction::SelectPlan(plan) => plans::select_plan(ctx, user_id, chat_id, &plan).await?,
        CallbackAction::CheckPayment(payment_id) => plans::check_payment(ctx, user_id, chat_id, &payment_id).await?,
        CallbackAction::SetLanguage(code) => settings::set_language(ctx, user_id, chat_id, &code).await?,
        CallbackAction::SetCurrency(code) => settings::set_currency(ctx, user_id, chat_id, &code).await?,
        CallbackAction::AdminFlow(action) => admin::start_flow(ctx, user_id, chat_id, &action).await?,
        CallbackAction::AdminGive(plan) => admin::give_self(ctx, user_id, chat_id, &plan).await?,
    }

    Ok(())
}

/// Begin step-by-step credential capture
async fn start_po_flow(ctx: &AppContext, user_id: i64, chat_id: i64) -> Result<()> {
    if reject_blocked(ctx, user_id, chat_id).await? {
        return Ok(());
    }

    ctx.database.save(user_id, &PoFlow::AwaitingLogin).await?;
    let lang = ctx.database.get_profile(user_id).await?.language;
    let keyboard = Keyboard::new().row(ctx.navigation.nav_row(lang.code(), false, true));
    ctx.navigation
        .send_text(user_id, chat_id, "po.prompt_login", None, Some(&keyboard))
        .await?;
    Ok(())
}
