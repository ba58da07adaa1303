//! Signal request flow
//!
//! Gates run in order and the first failing one answers the user:
//! ban, plan entitlement, stored credentials, sink availability.

use tracing::{error, info};

use crate::services::signal::{RequestType, WorkItem};
use crate::state::AppContext;
use crate::utils::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    Banned,
    RequiresPlan,
    RequiresCredentials,
    SinkUnavailable,
    SubmissionFailed,
    Submitted,
}

pub async fn request_signal(ctx: &AppContext, user_id: i64, chat_id: i64, request_type: RequestType) -> Result<SignalOutcome> {
    let auth = ctx.auth_service.get_auth_context(user_id).await?;
    if auth.is_blocked() {
        ctx.navigation.send_text(user_id, chat_id, "common.banned", None, None).await?;
        return Ok(SignalOutcome::Banned);
    }

    let profile = ctx.database.get_profile(user_id).await?;
    if !ctx.services.entitlement.allows(profile.plan, request_type) {
        ctx.navigation
            .send_text(user_id, chat_id, requires_plan_key(request_type), None, None)
            .await?;
        return Ok(SignalOutcome::RequiresPlan);
    }

    let has_credentials = ctx
        .database
        .get_credentials(user_id)
        .await?
        .is_some_and(|record| record.is_configured());
    if !has_credentials {
        ctx.navigation.send_text(user_id, chat_id, "signal.requires_po", None, None).await?;
        return Ok(SignalOutcome::RequiresCredentials);
    }

    let Some(sink) = ctx.services.signal_sink.as_ref() else {
        ctx.navigation.send_text(user_id, chat_id, "signal.unavailable", None, None).await?;
        return Ok(SignalOutcome::SinkUnavailable);
    };

    match sink.submit(&WorkItem::pending(user_id, request_type)).await {
        Ok(()) => {
            info!(user_id, request_type = %request_type, "Signal request submitted");
            ctx.navigation.send_text(user_id, chat_id, "signal.sent", None, None).await?;
            Ok(SignalOutcome::Submitted)
        }
        Err(e) => {
            error!(user_id, request_type = %request_type, error = %e, "Signal request submission failed");
            ctx.navigation.send_text(user_id, chat_id, "signal.unavailable", None, None).await?;
            Ok(SignalOutcome::SubmissionFailed)
        }
    }
}

fn requires_plan_key(request_type: RequestType) -> &'static str {
    match request_type {
        RequestType::LatestSignal => "signal.requires_plan",
        RequestType::Long => "signal.requires_plan_long",
        RequestType::Short => "signal.requires_plan_short",
    }
}
