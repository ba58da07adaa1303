//! Message handlers module
//!
//! Handles free-text messages. Text is only meaningful while the user is in a
//! multi-step flow (admin target entry or step-by-step credential capture);
//! anything else gets a short hint pointing back to the menu.

use std::sync::Arc;

use teloxide::{Bot, types::Message};
use tracing::debug;

use crate::handlers::commands::{admin, credentials};
use crate::handlers::{delete_incoming, recover, reject_blocked};
use crate::models::{AdminFlow, MessageRef, PoFlow};
use crate::services::messenger::Keyboard;
use crate::state::AppContext;
use crate::utils::errors::Result;

/// Handle incoming text messages
pub async fn handle_message(_bot: Bot, msg: Message, ctx: Arc<AppContext>) -> Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id.0;
    debug!(user_id, chat_id, "Processing message");

    handle_text(&ctx, user_id, chat_id, Some(MessageRef::new(chat_id, msg.id.0)), text).await
}

/// Route free text according to the user's active flow
pub async fn handle_text(ctx: &AppContext, user_id: i64, chat_id: i64, incoming: Option<MessageRef>, text: &str) -> Result<()> {
    // Flow input may carry secrets and is never kept in the chat
    delete_incoming(ctx, incoming).await;

    let result = route_text(ctx, user_id, chat_id, text).await;
    recover(ctx, user_id, chat_id, result).await
}

async fn route_text(ctx: &AppContext, user_id: i64, chat_id: i64, text: &str) -> Result<()> {
    if reject_blocked(ctx, user_id, chat_id).await? {
        return Ok(());
    }

    if let AdminFlow::AwaitingTarget { action } = ctx.database.load::<AdminFlow>(user_id).await? {
        admin::continue_flow(ctx, user_id, chat_id, action, text).await?;
        return Ok(());
    }

    match ctx.database.load::<PoFlow>(user_id).await? {
        PoFlow::AwaitingLogin => receive_login(ctx, user_id, chat_id, text.trim()).await,
        PoFlow::AwaitingPassword { login_enc } => receive_password(ctx, user_id, chat_id, &login_enc, text.trim()).await,
        PoFlow::Idle => {
            let keyboard = home_row(ctx, user_id).await?;
            ctx.navigation
                .send_text(user_id, chat_id, "common.unknown_input", None, Some(&keyboard))
                .await?;
            Ok(())
        }
    }
}

async fn receive_login(ctx: &AppContext, user_id: i64, chat_id: i64, login: &str) -> Result<()> {
    let keyboard = home_row(ctx, user_id).await?;
    if !credentials::valid_login(login) {
        ctx.navigation.send_text(user_id, chat_id, "po.invalid", None, Some(&keyboard)).await?;
        return Ok(());
    }

    let login_enc = match ctx.cipher.encrypt(login) {
        Ok(login_enc) => login_enc,
        Err(e) => {
            ctx.database.clear::<PoFlow>(user_id).await?;
            credentials::encryption_failed(ctx, user_id, chat_id, e).await?;
            return Ok(());
        }
    };

    ctx.database.save(user_id, &PoFlow::AwaitingPassword { login_enc }).await?;
    ctx.navigation
        .send_text(user_id, chat_id, "po.prompt_password", None, Some(&keyboard))
        .await?;
    Ok(())
}

async fn receive_password(ctx: &AppContext, user_id: i64, chat_id: i64, login_enc: &str, password: &str) -> Result<()> {
    if !credentials::valid_password(password) {
        let keyboard = home_row(ctx, user_id).await?;
        ctx.navigation.send_text(user_id, chat_id, "po.invalid", None, Some(&keyboard)).await?;
        return Ok(());
    }

    let password_enc = match ctx.cipher.encrypt(password) {
        Ok(password_enc) => password_enc,
        Err(e) => {
            ctx.database.clear::<PoFlow>(user_id).await?;
            credentials::encryption_failed(ctx, user_id, chat_id, e).await?;
            return Ok(());
        }
    };

    let outcome = credentials::store_login(ctx, user_id, chat_id, login_enc, &password_enc).await?;
    crate::utils::logging::log_user_action(user_id, "set_po_flow", Some(&format!("{:?}", outcome)));
    Ok(())
}

async fn home_row(ctx: &AppContext, user_id: i64) -> Result<Keyboard> {
    let lang = ctx.database.get_profile(user_id).await?.language;
    Ok(Keyboard::new().row(ctx.navigation.nav_row(lang.code(), false, true)))
}
