//! Admin panel callbacks

use crate::handlers::reject_blocked;
use crate::i18n::params;
use crate::models::{AdminAction, AdminFlow, Plan, ProfileUpdate};
use crate::services::auth::Permission;
use crate::services::messenger::Keyboard;
use crate::state::AppContext;
use crate::utils::errors::Result;
use crate::utils::logging::log_admin_action;

/// Handle `admin:flow:<action>`: wait for the target in the next message
pub async fn start_flow(ctx: &AppContext, user_id: i64, chat_id: i64, action: &str) -> Result<()> {
    if reject_blocked(ctx, user_id, chat_id).await? {
        return Ok(());
    }
    if !ctx.auth_service.has_permission(user_id, Permission::Moderate).await? {
        ctx.navigation.send_text(user_id, chat_id, "admin.denied", None, None).await?;
        return Ok(());
    }

    let lang = ctx.database.get_profile(user_id).await?.language;
    let keyboard = Keyboard::new().row(ctx.navigation.nav_row(lang.code(), false, true));

    let Ok(action) = action.parse::<AdminAction>() else {
        ctx.navigation
            .send_text(user_id, chat_id, "admin.bad_input", None, Some(&keyboard))
            .await?;
        return Ok(());
    };

    ctx.database.save(user_id, &AdminFlow::AwaitingTarget { action }).await?;
    let prompt = format!("admin.prompt_{}", action.code());
    ctx.navigation.send_text(user_id, chat_id, &prompt, None, Some(&keyboard)).await?;
    Ok(())
}

/// Handle `admin:give:<plan>`: the root admin grants themself a plan
pub async fn give_self(ctx: &AppContext, user_id: i64, chat_id: i64, plan: &str) -> Result<()> {
    if !ctx.auth_service.has_permission(user_id, Permission::RootAdmin).await? {
        if !reject_blocked(ctx, user_id, chat_id).await? {
            ctx.navigation.send_text(user_id, chat_id, "admin.denied", None, None).await?;
        }
        return Ok(());
    }

    let Some(plan) = plan.parse::<Plan>().ok().filter(|p| p.is_purchasable()) else {
        return Ok(());
    };

    ctx.database
        .update_profile(
            user_id,
            ProfileUpdate {
                plan: Some(plan),
                is_admin: Some(true),
                is_banned: Some(false),
                ..Default::default()
            },
        )
        .await?;
    ctx.database.clear::<AdminFlow>(user_id).await?;
    log_admin_action(user_id, "give_self", Some(user_id), Some(plan.code()));

    let lang = ctx.database.get_profile(user_id).await?.language;
    let keyboard = Keyboard::new().row(ctx.navigation.nav_row(lang.code(), false, true));
    let plan_label = plan.code().to_uppercase();
    ctx.navigation
        .send_text(user_id, chat_id, "admin.god_done", Some(&params([("plan", plan_label)])), Some(&keyboard))
        .await?;
    Ok(())
}
