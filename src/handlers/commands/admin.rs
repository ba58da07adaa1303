//! Admin command handlers
//!
//! Moderation (ban, unban, plan grants, resets) is open to the root admin and
//! to users carrying the stored admin flag. Managing admins is root-only.

use tracing::{info, warn};

use crate::handlers::reject_blocked;
use crate::models::{AdminAction, AdminFlow, Plan, ProfileUpdate};
use crate::services::auth::Permission;
use crate::services::messenger::{Button, Keyboard};
use crate::state::AppContext;
use crate::utils::errors::Result;
use crate::utils::helpers::{parse_user_id, split_args};
use crate::utils::logging::log_admin_action;

/// Admin commands taking a target user id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    Ban,
    Unban,
    Reset,
    AddAdmin,
    RemoveAdmin,
}

/// A fully specified admin operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminOp {
    Ban(i64),
    Unban(i64),
    Reset(i64),
    SetPlan(i64, Plan),
    AddAdmin(i64),
    RemoveAdmin(i64),
}

impl AdminOp {
    pub fn required_permission(&self) -> Permission {
        match self {
            AdminOp::AddAdmin(_) | AdminOp::RemoveAdmin(_) => Permission::RootAdmin,
            _ => Permission::Moderate,
        }
    }

    pub fn target(&self) -> i64 {
        match *self {
            AdminOp::Ban(id)
            | AdminOp::Unban(id)
            | AdminOp::Reset(id)
            | AdminOp::SetPlan(id, _)
            | AdminOp::AddAdmin(id)
            | AdminOp::RemoveAdmin(id) => id,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            AdminOp::Ban(_) => "ban",
            AdminOp::Unban(_) => "unban",
            AdminOp::Reset(_) => "reset",
            AdminOp::SetPlan(..) => "set_plan",
            AdminOp::AddAdmin(_) => "add_admin",
            AdminOp::RemoveAdmin(_) => "remove_admin",
        }
    }

    /// Build the operation for a pending flow action from free-text input
    ///
    /// `set_plan` expects `<id> <plan>`, every other action a bare `<id>`.
    pub fn from_flow_input(action: AdminAction, text: &str) -> Option<Self> {
        let args = split_args(text);
        match (action, args.as_slice()) {
            (AdminAction::Ban, [id]) => parse_user_id(id).map(AdminOp::Ban),
            (AdminAction::Unban, [id]) => parse_user_id(id).map(AdminOp::Unban),
            (AdminAction::Reset, [id]) => parse_user_id(id).map(AdminOp::Reset),
            (AdminAction::SetPlan, [id, plan]) => {
                let plan = plan.parse::<Plan>().ok()?;
                parse_user_id(id).map(|id| AdminOp::SetPlan(id, plan))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminOutcome {
    Done,
    Denied,
    BadInput,
}

/// Handle /admin: the admin panel with flow buttons
pub async fn handle_admin_panel(ctx: &AppContext, user_id: i64, chat_id: i64) -> Result<()> {
    let auth = ctx.auth_service.get_auth_context(user_id).await?;
    if auth.is_blocked() {
        ctx.navigation.send_text(user_id, chat_id, "common.banned", None, None).await?;
        return Ok(());
    }
    if !auth.permissions.contains(&Permission::Moderate) {
        ctx.navigation.send_text(user_id, chat_id, "admin.denied", None, None).await?;
        return Ok(());
    }

    let lang = ctx.database.get_profile(user_id).await?.language;
    let lang = lang.code();
    let t = |key: &str| ctx.i18n.t(key, lang, None);

    let mut keyboard = Keyboard::new()
        .row(vec![Button::callback(t("admin.btn_ban"), "admin:flow:ban")])
        .row(vec![Button::callback(t("admin.btn_unban"), "admin:flow:unban")])
        .row(vec![Button::callback(t("admin.btn_set_plan"), "admin:flow:set_plan")])
        .row(vec![Button::callback(t("admin.btn_reset"), "admin:flow:reset")]);

    if auth.is_root_admin {
        let give_row = [Plan::Long, Plan::Short, Plan::Vip]
            .into_iter()
            .map(|plan| {
                let label = ctx.i18n.t(&format!("plans.{}", plan.code()), lang, None);
                let text = ctx.i18n.t("admin.btn_give_me", lang, Some(&crate::i18n::params([("plan", label)])));
                Button::callback(text, format!("admin:give:{}", plan.code()))
            })
            .collect();
        keyboard = keyboard.row(give_row);
    }
    keyboard = keyboard.row(ctx.navigation.nav_row(lang, false, true));

    let text = format!("{}\n\n{}", t("admin.panel_title"), t("admin.help"));
    ctx.navigation.send_ui(user_id, chat_id, &text, Some(&keyboard)).await?;
    Ok(())
}

/// Handle /ban_user, /unban_user, /add_admin, /remove_admin, /reset_user
pub async fn handle_admin_command(ctx: &AppContext, user_id: i64, chat_id: i64, command: AdminCommand, args: &str) -> Result<()> {
    if reject_blocked(ctx, user_id, chat_id).await? {
        return Ok(());
    }

    let target = split_args(args).first().and_then(|arg| parse_user_id(arg));
    let Some(target) = target else {
        let required = match command {
            AdminCommand::AddAdmin | AdminCommand::RemoveAdmin => Permission::RootAdmin,
            _ => Permission::Moderate,
        };
        let key = if ctx.auth_service.has_permission(user_id, required).await? {
            "admin.bad_args"
        } else {
            "admin.denied"
        };
        ctx.navigation.send_text(user_id, chat_id, key, None, None).await?;
        return Ok(());
    };

    let op = match command {
        AdminCommand::Ban => AdminOp::Ban(target),
        AdminCommand::Unban => AdminOp::Unban(target),
        AdminCommand::Reset => AdminOp::Reset(target),
        AdminCommand::AddAdmin => AdminOp::AddAdmin(target),
        AdminCommand::RemoveAdmin => AdminOp::RemoveAdmin(target),
    };

    execute(ctx, user_id, chat_id, op).await?;
    Ok(())
}

/// Check permission, apply the operation and report back to the admin
pub async fn execute(ctx: &AppContext, admin_id: i64, chat_id: i64, op: AdminOp) -> Result<AdminOutcome> {
    if !ctx.auth_service.has_permission(admin_id, op.required_permission()).await? {
        warn!(admin_id, action = op.name(), "Admin action denied");
        ctx.navigation.send_text(admin_id, chat_id, "admin.denied", None, None).await?;
        return Ok(AdminOutcome::Denied);
    }

    apply(ctx, op).await?;
    log_admin_action(admin_id, op.name(), Some(op.target()), None);

    if op.target() != admin_id || !matches!(op, AdminOp::Reset(_)) {
        ctx.navigation.send_text(admin_id, chat_id, "admin.done", None, None).await?;
    } else {
        // Self-reset wiped the admin's own UI locator; start clean
        ctx.navigation.home(admin_id, chat_id).await?;
    }
    Ok(AdminOutcome::Done)
}

async fn apply(ctx: &AppContext, op: AdminOp) -> Result<()> {
    match op {
        AdminOp::Ban(target) => {
            ctx.database.update_profile(target, ProfileUpdate::banned(true)).await?;
        }
        AdminOp::Unban(target) => {
            ctx.database.update_profile(target, ProfileUpdate::banned(false)).await?;
        }
        AdminOp::SetPlan(target, plan) => {
            ctx.database.update_profile(target, ProfileUpdate::plan(plan)).await?;
        }
        AdminOp::AddAdmin(target) => {
            ctx.database.update_profile(target, ProfileUpdate::admin(true)).await?;
        }
        AdminOp::RemoveAdmin(target) => {
            ctx.database.update_profile(target, ProfileUpdate::admin(false)).await?;
        }
        AdminOp::Reset(target) => {
            ctx.database.reset(target).await?;
        }
    }
    info!(action = op.name(), target = op.target(), "Admin operation applied");
    Ok(())
}

/// Interpret free text while an admin flow awaits its target
pub async fn continue_flow(ctx: &AppContext, admin_id: i64, chat_id: i64, action: AdminAction, text: &str) -> Result<AdminOutcome> {
    if !ctx.auth_service.has_permission(admin_id, Permission::Moderate).await? {
        ctx.database.clear::<AdminFlow>(admin_id).await?;
        ctx.navigation.send_text(admin_id, chat_id, "admin.denied", None, None).await?;
        return Ok(AdminOutcome::Denied);
    }

    let Some(op) = AdminOp::from_flow_input(action, text) else {
        let lang = ctx.database.get_profile(admin_id).await?.language;
        let keyboard = Keyboard::new().row(ctx.navigation.nav_row(lang.code(), false, true));
        ctx.navigation
            .send_text(admin_id, chat_id, "admin.bad_input", None, Some(&keyboard))
            .await?;
        return Ok(AdminOutcome::BadInput);
    };

    ctx.database.clear::<AdminFlow>(admin_id).await?;
    execute(ctx, admin_id, chat_id, op).await
}
