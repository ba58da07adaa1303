//! Settings callbacks

use crate::models::{Currency, Language, ProfileUpdate};
use crate::state::screens::SETTINGS;
use crate::state::{AppContext, Transition};
use crate::utils::errors::Result;

/// Handle `set:lang:<code>`; unsupported codes just redraw settings
pub async fn set_language(ctx: &AppContext, user_id: i64, chat_id: i64, code: &str) -> Result<()> {
    if let Ok(language) = code.parse::<Language>() {
        if ctx.i18n.is_language_supported(language.code()) && !ctx.auth_service.is_blocked(user_id).await? {
            ctx.database.update_profile(user_id, ProfileUpdate::language(language)).await?;
        }
    }

    ctx.navigation.show_screen(user_id, chat_id, SETTINGS, Transition::REPLACE).await?;
    Ok(())
}

/// Handle `set:currency:<code>`
pub async fn set_currency(ctx: &AppContext, user_id: i64, chat_id: i64, code: &str) -> Result<()> {
    if let Ok(currency) = code.parse::<Currency>() {
        if !ctx.auth_service.is_blocked(user_id).await? {
            ctx.database.update_profile(user_id, ProfileUpdate::currency(currency)).await?;
        }
    }

    ctx.navigation.show_screen(user_id, chat_id, SETTINGS, Transition::REPLACE).await?;
    Ok(())
}
