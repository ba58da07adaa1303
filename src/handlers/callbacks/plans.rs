//! Plan selection and payment callbacks

use tracing::{error, info};

use crate::handlers::reject_blocked;
use crate::i18n::params;
use crate::models::{PaymentStatus, PendingPayment, PendingPaymentInfo, Plan, ProfileUpdate};
use crate::services::messenger::{Button, Keyboard};
use crate::state::screens::PLANS;
use crate::state::{AppContext, Transition};
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;

/// Handle `plan:select:<plan>`
///
/// `free` is applied at once; purchasable plans create a pending crypto payment.
pub async fn select_plan(ctx: &AppContext, user_id: i64, chat_id: i64, plan: &str) -> Result<()> {
    if reject_blocked(ctx, user_id, chat_id).await? {
        return Ok(());
    }

    let plan = match plan.parse::<Plan>() {
        Ok(Plan::Free) => {
            ctx.database.update_profile(user_id, ProfileUpdate::plan(Plan::Free)).await?;
            log_user_action(user_id, "plan_free", None);
            ctx.navigation.show_screen(user_id, chat_id, PLANS, Transition::REPLACE).await?;
            return Ok(());
        }
        Ok(plan) => plan,
        Err(_) => {
            ctx.navigation.show_screen(user_id, chat_id, PLANS, Transition::REPLACE).await?;
            return Ok(());
        }
    };

    let Some(amount) = ctx.settings.payments.price_for(plan) else {
        ctx.navigation.show_screen(user_id, chat_id, PLANS, Transition::REPLACE).await?;
        return Ok(());
    };

    let asset = ctx.settings.payments.asset.clone();
    let payment = match ctx.services.payments.create_payment(user_id, plan, amount, &asset).await {
        Ok(payment) => payment,
        Err(e) => {
            error!(user_id, plan = %plan, error = %e, "Failed to create payment");
            ctx.navigation.send_text(user_id, chat_id, "common.service_unavailable", None, None).await?;
            return Ok(());
        }
    };

    ctx.database
        .save(
            user_id,
            &PendingPayment(Some(PendingPaymentInfo {
                payment_id: payment.payment_id.clone(),
                plan,
                amount,
                currency: payment.currency.clone(),
            })),
        )
        .await?;

    let lang = ctx.database.get_profile(user_id).await?.language;
    let lang = lang.code();
    let keyboard = Keyboard::new()
        .row(vec![Button::callback(
            ctx.i18n.t("buttons.check_payment", lang, None),
            format!("plan:check:{}", payment.payment_id),
        )])
        .row(ctx.navigation.nav_row(lang, true, true));

    let text = ctx.i18n.t(
        "payments.created",
        lang,
        Some(&params([
            ("plan", plan.code().to_uppercase()),
            ("amount", format!("{:.2}", amount)),
            ("currency", payment.currency.clone()),
            ("payment_id", payment.payment_id.clone()),
            ("pay_url", payment.pay_url.clone().unwrap_or_default()),
        ])),
    );
    ctx.navigation.send_ui(user_id, chat_id, &text, Some(&keyboard)).await?;

    log_user_action(user_id, "payment_created", Some(&payment.payment_id));
    Ok(())
}

/// Handle `plan:check:<payment_id>`
///
/// The plan changes only when the provider reports `paid` for the payment
/// recorded as pending for this user.
pub async fn check_payment(ctx: &AppContext, user_id: i64, chat_id: i64, payment_id: &str) -> Result<()> {
    if reject_blocked(ctx, user_id, chat_id).await? {
        return Ok(());
    }

    let PendingPayment(pending) = ctx.database.load(user_id).await?;
    let status = match ctx.services.payments.check_status(payment_id).await {
        Ok(status) => status,
        Err(e) => {
            error!(user_id, payment_id, error = %e, "Payment status check failed");
            PaymentStatus::Pending
        }
    };

    let confirmed = pending.filter(|p| status == PaymentStatus::Paid && p.payment_id == payment_id);
    let lang = ctx.database.get_profile(user_id).await?.language;
    let keyboard = Keyboard::new().row(ctx.navigation.nav_row(lang.code(), false, true));

    match confirmed {
        Some(payment) => {
            ctx.database.update_profile(user_id, ProfileUpdate::plan(payment.plan)).await?;
            ctx.database.clear::<PendingPayment>(user_id).await?;
            info!(user_id, plan = %payment.plan, payment_id, "Payment confirmed");

            let plan_label = payment.plan.code().to_uppercase();
            ctx.navigation
                .send_text(user_id, chat_id, "payments.paid", Some(&params([("plan", plan_label)])), Some(&keyboard))
                .await?;
        }
        None => {
            ctx.navigation
                .send_text(user_id, chat_id, "payments.pending", None, Some(&keyboard))
                .await?;
        }
    }

    Ok(())
}
