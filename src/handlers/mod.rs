//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for bot commands
//! - Callback handlers for inline keyboard interactions
//! - Message handlers for free-text input
//!
//! Each teloxide-facing handler only extracts ids from the update and calls a
//! gateway-neutral function taking the [`AppContext`], which is what the
//! integration tests drive.

pub mod commands;
pub mod callbacks;
pub mod messages;
pub mod signal;

// Re-export commonly used handler functions
pub use commands::{Command, handle_command, run_command};
pub use callbacks::{CallbackAction, handle_callback_query, route_callback};
pub use messages::{handle_message, handle_text};
pub use signal::{request_signal, SignalOutcome};

use tracing::{debug, error};

use crate::models::MessageRef;
use crate::state::AppContext;
use crate::utils::errors::Result;

/// Send the restriction notice if the user is banned; returns whether they were
pub(crate) async fn reject_blocked(ctx: &AppContext, user_id: i64, chat_id: i64) -> Result<bool> {
    if ctx.auth_service.is_blocked(user_id).await? {
        ctx.navigation.send_text(user_id, chat_id, "common.banned", None, None).await?;
        return Ok(true);
    }
    Ok(false)
}

/// Delete a message the user sent, ignoring failures
pub(crate) async fn delete_incoming(ctx: &AppContext, message: Option<MessageRef>) {
    if let Some(message) = message {
        if let Err(e) = ctx.messenger.delete_message(message).await {
            debug!(error = %e, "Could not delete incoming message");
        }
    }
}

/// Turn a recoverable failure into a "try again later" notice
///
/// The notice goes straight through the messenger in the default language,
/// since the store may be the thing that failed. Non-recoverable errors are
/// returned unchanged.
pub(crate) async fn recover(ctx: &AppContext, user_id: i64, chat_id: i64, result: Result<()>) -> Result<()> {
    let Err(e) = result else {
        return Ok(());
    };
    if !e.is_recoverable() {
        return Err(e);
    }

    error!(user_id, error = %e, severity = %e.severity(), "Update failed, user notified");
    let text = ctx.i18n.t("common.service_unavailable", ctx.i18n.default_language(), None);
    if let Err(send_error) = ctx.messenger.send_message(chat_id, &text, None).await {
        debug!(user_id, error = %send_error, "Could not send failure notice");
    }
    Ok(())
}
