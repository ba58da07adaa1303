//! Broker credential capture: /set_po, /set_ssid and the step-by-step flow

mod helpers;

use helpers::*;
use signal_ui_bot::handlers::handle_text;
use signal_ui_bot::models::{MessageRef, PoFlow};

async fn po_flow(ctx: &TestContext, user_id: i64) -> PoFlow {
    ctx.app.database.load(user_id).await.unwrap()
}

#[tokio::test]
async fn test_set_po_stores_ciphertext_only() {
    let ctx = TestContext::new().await;
    ctx.command(USER_ID, &format!("/set_po {} {}", TEST_LOGIN, TEST_PASSWORD)).await;

    assert_eq!(ctx.messenger.last_sent().text, ctx.t("po.saved"));

    let pair = ctx
        .app
        .database
        .get_credentials(USER_ID)
        .await
        .unwrap()
        .and_then(|record| record.login_pair())
        .expect("credentials stored");
    assert_ne!(pair.login_enc, TEST_LOGIN);
    assert_ne!(pair.password_enc, TEST_PASSWORD);
    assert_eq!(ctx.app.cipher.decrypt(&pair.login_enc).unwrap(), TEST_LOGIN);
    assert_eq!(ctx.app.cipher.decrypt(&pair.password_enc).unwrap(), TEST_PASSWORD);
}

#[tokio::test]
async fn test_set_po_usage_and_validation() {
    let ctx = TestContext::new().await;

    ctx.command(USER_ID, "/set_po only_login").await;
    assert_eq!(ctx.messenger.last_sent().text, ctx.t("po.usage"));

    ctx.command(USER_ID, "/set_po ab longenough").await;
    assert_eq!(ctx.messenger.last_sent().text, ctx.t("po.invalid"));

    ctx.command(USER_ID, "/set_po trader 12345").await;
    assert_eq!(ctx.messenger.last_sent().text, ctx.t("po.invalid"));

    assert!(ctx.app.database.get_credentials(USER_ID).await.unwrap().is_none());
}

#[tokio::test]
async fn test_banned_user_cannot_store_credentials() {
    let ctx = TestContext::new().await;
    ban(&ctx, USER_ID).await;

    ctx.command(USER_ID, &format!("/set_po {} {}", TEST_LOGIN, TEST_PASSWORD)).await;

    assert_eq!(ctx.messenger.last_sent().text, ctx.t("common.banned"));
    assert!(ctx.app.database.get_credentials(USER_ID).await.unwrap().is_none());
}

#[tokio::test]
async fn test_step_by_step_capture() {
    let ctx = TestContext::new().await;
    ctx.command(USER_ID, "/settings").await;

    ctx.click(USER_ID, "action:set_po").await;
    assert_eq!(po_flow(&ctx, USER_ID).await, PoFlow::AwaitingLogin);
    assert_eq!(ctx.messenger.last_sent().text, ctx.t("po.prompt_login"));

    let login_message = MessageRef::new(USER_ID, 7);
    handle_text(&ctx.app, USER_ID, USER_ID, Some(login_message), TEST_LOGIN).await.unwrap();
    assert!(matches!(po_flow(&ctx, USER_ID).await, PoFlow::AwaitingPassword { .. }));
    assert_eq!(ctx.messenger.last_sent().text, ctx.t("po.prompt_password"));
    assert!(ctx.messenger.deleted().contains(&login_message));

    let password_message = MessageRef::new(USER_ID, 8);
    handle_text(&ctx.app, USER_ID, USER_ID, Some(password_message), TEST_PASSWORD).await.unwrap();
    assert_eq!(po_flow(&ctx, USER_ID).await, PoFlow::Idle);
    assert_eq!(ctx.messenger.last_sent().text, ctx.t("po.saved"));
    assert!(ctx.messenger.deleted().contains(&password_message));

    let record = ctx.app.database.get_credentials(USER_ID).await.unwrap().unwrap();
    let pair = record.login_pair().unwrap();
    assert_eq!(ctx.app.cipher.decrypt(&pair.login_enc).unwrap(), TEST_LOGIN);
    assert_eq!(ctx.app.cipher.decrypt(&pair.password_enc).unwrap(), TEST_PASSWORD);
}

#[tokio::test]
async fn test_flow_rejects_short_values_and_keeps_step() {
    let ctx = TestContext::new().await;
    ctx.click(USER_ID, "action:set_po").await;

    ctx.text(USER_ID, "ab").await;
    assert_eq!(ctx.messenger.last_sent().text, ctx.t("po.invalid"));
    assert_eq!(po_flow(&ctx, USER_ID).await, PoFlow::AwaitingLogin);

    ctx.text(USER_ID, TEST_LOGIN).await;
    ctx.text(USER_ID, "12345").await;
    assert!(matches!(po_flow(&ctx, USER_ID).await, PoFlow::AwaitingPassword { .. }));
    assert!(ctx.app.database.get_credentials(USER_ID).await.unwrap().is_none());
}

#[tokio::test]
async fn test_pending_login_is_never_plaintext() {
    let ctx = TestContext::new().await;
    ctx.click(USER_ID, "action:set_po").await;
    ctx.text(USER_ID, TEST_LOGIN).await;

    let raw = ctx.app.database.states.get(USER_ID, "po_flow").await.unwrap().unwrap();
    assert!(!raw.contains(TEST_LOGIN));
}

#[tokio::test]
async fn test_ssid_and_login_are_merged() {
    let ctx = TestContext::new().await;
    ctx.command(USER_ID, "/set_ssid session-token-1").await;
    assert_eq!(ctx.messenger.last_sent().text, ctx.t("po.ssid_saved"));

    ctx.command(USER_ID, &format!("/set_po {} {}", TEST_LOGIN, TEST_PASSWORD)).await;

    let record = ctx.app.database.get_credentials(USER_ID).await.unwrap().unwrap();
    assert!(record.login_pair().is_some());
    let ssid_enc = ctx.app.database.get_ssid(USER_ID).await.unwrap().unwrap();
    assert_eq!(ctx.app.cipher.decrypt(&ssid_enc).unwrap(), "session-token-1");
}

#[tokio::test]
async fn test_set_ssid_usage() {
    let ctx = TestContext::new().await;
    ctx.command(USER_ID, "/set_ssid").await;
    assert_eq!(ctx.messenger.last_sent().text, ctx.t("po.ssid_usage"));
    assert!(ctx.app.database.get_ssid(USER_ID).await.unwrap().is_none());
}

#[tokio::test]
async fn test_text_outside_any_flow_gets_hint() {
    let ctx = TestContext::new().await;
    ctx.text(USER_ID, "hello").await;

    let sent = ctx.messenger.last_sent();
    assert_eq!(sent.text, ctx.t("common.unknown_input"));
    assert!(sent.has_action("nav:home"));
}

#[tokio::test]
async fn test_admin_flow_takes_precedence_over_po_flow() {
    let ctx = TestContext::new().await;
    ctx.click(ROOT_ADMIN_ID, "action:set_po").await;
    ctx.click(ROOT_ADMIN_ID, "admin:flow:ban").await;

    ctx.text(ROOT_ADMIN_ID, "42").await;

    assert!(ctx.profile(USER_ID).await.is_banned);
    assert_eq!(po_flow(&ctx, ROOT_ADMIN_ID).await, PoFlow::AwaitingLogin);
}
