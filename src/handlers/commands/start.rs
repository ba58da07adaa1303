//! Start and screen command handlers

use tracing::info;

use crate::models::ProfileUpdate;
use crate::state::{AppContext, Transition};
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;

/// Handle /start: register the user and show a fresh home screen
pub async fn handle_start(ctx: &AppContext, user_id: i64, chat_id: i64) -> Result<()> {
    let profile = ctx.database.ensure(user_id).await?;

    if ctx.auth_service.is_root_admin(user_id) && !profile.is_admin {
        ctx.database.update_profile(user_id, ProfileUpdate::admin(true)).await?;
        info!(user_id, "Root admin flag stored");
    }

    log_user_action(user_id, "start", None);
    ctx.navigation.home(user_id, chat_id).await?;
    Ok(())
}

/// Forward navigation shared by screen commands and `nav:` callbacks
pub async fn open_screen(ctx: &AppContext, user_id: i64, chat_id: i64, screen: &str) -> Result<()> {
    ctx.navigation.show_screen(user_id, chat_id, screen, Transition::PUSH).await?;
    Ok(())
}
