//! Broker credential commands
//!
//! Plaintext never leaves these functions: it is encrypted right after
//! validation and only ciphertext reaches the store.

use tracing::error;

use crate::handlers::reject_blocked;
use crate::models::PoFlow;
use crate::state::AppContext;
use crate::utils::errors::{CryptoError, Result};
use crate::utils::helpers::{char_len_between, split_args};
use crate::utils::logging::log_user_action;

pub const LOGIN_LEN: (usize, usize) = (3, 100);
pub const PASSWORD_LEN: (usize, usize) = (6, 100);
pub const SSID_LEN: (usize, usize) = (1, 1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialOutcome {
    Saved,
    Usage,
    Invalid,
    EncryptionFailed,
    StorageFailed,
    Banned,
}

pub fn valid_login(login: &str) -> bool {
    char_len_between(login, LOGIN_LEN.0, LOGIN_LEN.1)
}

pub fn valid_password(password: &str) -> bool {
    char_len_between(password, PASSWORD_LEN.0, PASSWORD_LEN.1)
}

/// Handle /set_po <login> <password>
pub async fn handle_set_po(ctx: &AppContext, user_id: i64, chat_id: i64, args: &str) -> Result<()> {
    let outcome = set_po(ctx, user_id, chat_id, args).await?;
    log_user_action(user_id, "set_po", Some(&format!("{:?}", outcome)));
    Ok(())
}

pub async fn set_po(ctx: &AppContext, user_id: i64, chat_id: i64, args: &str) -> Result<CredentialOutcome> {
    if reject_blocked(ctx, user_id, chat_id).await? {
        return Ok(CredentialOutcome::Banned);
    }

    let args = split_args(args);
    let [login, password] = args.as_slice() else {
        ctx.navigation.send_text(user_id, chat_id, "po.usage", None, None).await?;
        return Ok(CredentialOutcome::Usage);
    };

    if !valid_login(login) || !valid_password(password) {
        ctx.navigation.send_text(user_id, chat_id, "po.invalid", None, None).await?;
        return Ok(CredentialOutcome::Invalid);
    }

    let encrypted = ctx
        .cipher
        .encrypt(login)
        .and_then(|login_enc| Ok((login_enc, ctx.cipher.encrypt(password)?)));
    let (login_enc, password_enc) = match encrypted {
        Ok(pair) => pair,
        Err(e) => return encryption_failed(ctx, user_id, chat_id, e).await,
    };

    store_login(ctx, user_id, chat_id, &login_enc, &password_enc).await
}

/// Persist an encrypted pair and confirm; shared with the step-by-step flow
pub(crate) async fn store_login(ctx: &AppContext, user_id: i64, chat_id: i64, login_enc: &str, password_enc: &str) -> Result<CredentialOutcome> {
    if let Err(e) = ctx.database.save_credentials(user_id, login_enc, password_enc).await {
        error!(user_id, error = %e, "Failed to store credentials");
        ctx.navigation.send_text(user_id, chat_id, "common.db_error", None, None).await?;
        return Ok(CredentialOutcome::StorageFailed);
    }

    ctx.database.clear::<PoFlow>(user_id).await?;
    ctx.navigation.send_text(user_id, chat_id, "po.saved", None, None).await?;
    Ok(CredentialOutcome::Saved)
}

pub(crate) async fn encryption_failed(ctx: &AppContext, user_id: i64, chat_id: i64, e: CryptoError) -> Result<CredentialOutcome> {
    error!(user_id, error = %e, "Failed to encrypt credentials");
    ctx.navigation.send_text(user_id, chat_id, "common.encryption_error", None, None).await?;
    Ok(CredentialOutcome::EncryptionFailed)
}

/// Handle /set_ssid <ssid>
pub async fn handle_set_ssid(ctx: &AppContext, user_id: i64, chat_id: i64, args: &str) -> Result<()> {
    let outcome = set_ssid(ctx, user_id, chat_id, args).await?;
    log_user_action(user_id, "set_ssid", Some(&format!("{:?}", outcome)));
    Ok(())
}

pub async fn set_ssid(ctx: &AppContext, user_id: i64, chat_id: i64, args: &str) -> Result<CredentialOutcome> {
    if reject_blocked(ctx, user_id, chat_id).await? {
        return Ok(CredentialOutcome::Banned);
    }

    let args = split_args(args);
    let [ssid] = args.as_slice() else {
        ctx.navigation.send_text(user_id, chat_id, "po.ssid_usage", None, None).await?;
        return Ok(CredentialOutcome::Usage);
    };
    if !char_len_between(ssid, SSID_LEN.0, SSID_LEN.1) {
        ctx.navigation.send_text(user_id, chat_id, "po.ssid_usage", None, None).await?;
        return Ok(CredentialOutcome::Invalid);
    }

    let ssid_enc = match ctx.cipher.encrypt(ssid) {
        Ok(ssid_enc) => ssid_enc,
        Err(e) => return encryption_failed(ctx, user_id, chat_id, e).await,
    };

    if let Err(e) = ctx.database.save_ssid(user_id, &ssid_enc).await {
        error!(user_id, error = %e, "Failed to store session id");
        ctx.navigation.send_text(user_id, chat_id, "common.db_error", None, None).await?;
        return Ok(CredentialOutcome::StorageFailed);
    }

    ctx.navigation.send_text(user_id, chat_id, "po.ssid_saved", None, None).await?;
    Ok(CredentialOutcome::Saved)
}
