//! Navigation engine tests
//!
//! Covers the back/home stack, smart message replacement and the rules for
//! banned users and unknown screens.

mod helpers;

use assert_matches::assert_matches;
use helpers::*;
use proptest::prelude::*;
use signal_ui_bot::models::{ProfileUpdate, NAV_STACK_LIMIT};
use signal_ui_bot::state::screens::{HELP, HOME, MENU, SETTINGS};
use signal_ui_bot::state::{NavOutcome, Transition};

#[tokio::test]
async fn test_start_shows_home_without_nav_controls() {
    let ctx = TestContext::new().await;
    ctx.command(USER_ID, "/start").await;

    assert_eq!(ctx.current_screen(USER_ID).await, HOME);
    assert!(ctx.nav_stack(USER_ID).await.is_empty());

    let sent = ctx.messenger.last_sent();
    assert!(sent.text.contains(&USER_ID.to_string()));
    assert!(sent.has_action("nav:menu"));
    assert!(!sent.has_action("nav:back"));
    assert!(!sent.has_action("nav:home"));
}

#[tokio::test]
async fn test_back_walks_the_stack_in_reverse() {
    let ctx = TestContext::new().await;
    ctx.command(USER_ID, "/start").await;

    ctx.click(USER_ID, "nav:menu").await;
    assert_eq!(ctx.nav_stack(USER_ID).await, vec![HOME]);
    assert!(ctx.messenger.last_sent().has_action("nav:back"));
    assert!(ctx.messenger.last_sent().has_action("nav:home"));

    ctx.click(USER_ID, "nav:settings").await;
    assert_eq!(ctx.current_screen(USER_ID).await, SETTINGS);
    assert_eq!(ctx.nav_stack(USER_ID).await, vec![HOME, MENU]);

    ctx.click(USER_ID, "nav:back").await;
    assert_eq!(ctx.current_screen(USER_ID).await, MENU);
    assert_eq!(ctx.nav_stack(USER_ID).await, vec![HOME]);

    ctx.click(USER_ID, "nav:back").await;
    assert_eq!(ctx.current_screen(USER_ID).await, HOME);
    assert!(ctx.nav_stack(USER_ID).await.is_empty());

    // Empty stack falls back to home
    ctx.click(USER_ID, "nav:back").await;
    assert_eq!(ctx.current_screen(USER_ID).await, HOME);
    assert!(ctx.nav_stack(USER_ID).await.is_empty());
}

#[tokio::test]
async fn test_menu_plans_back_back_back() {
    let ctx = TestContext::new().await;
    ctx.command(USER_ID, "/start").await;
    ctx.click(USER_ID, "nav:menu").await;
    ctx.click(USER_ID, "nav:plans").await;

    let mut visited = Vec::new();
    for _ in 0..3 {
        ctx.click(USER_ID, "nav:back").await;
        visited.push(ctx.current_screen(USER_ID).await);
    }

    assert_eq!(visited, vec![MENU, HOME, HOME]);
    assert!(ctx.nav_stack(USER_ID).await.is_empty());
}

#[tokio::test]
async fn test_back_after_reset_transition_goes_home() {
    let ctx = TestContext::new().await;
    ctx.command(USER_ID, "/start").await;
    ctx.click(USER_ID, "nav:menu").await;
    ctx.click(USER_ID, "nav:help").await;

    ctx.app
        .navigation
        .show_screen(USER_ID, USER_ID, SETTINGS, Transition::RESET)
        .await
        .unwrap();
    assert!(ctx.nav_stack(USER_ID).await.is_empty());

    ctx.click(USER_ID, "nav:back").await;
    assert_eq!(ctx.current_screen(USER_ID).await, HOME);
}

#[tokio::test]
async fn test_renavigating_to_current_screen_does_not_push() {
    let ctx = TestContext::new().await;
    ctx.command(USER_ID, "/start").await;
    ctx.click(USER_ID, "nav:menu").await;
    ctx.click(USER_ID, "nav:menu").await;

    assert_eq!(ctx.nav_stack(USER_ID).await, vec![HOME]);
}

#[tokio::test]
async fn test_home_clears_the_stack() {
    let ctx = TestContext::new().await;
    ctx.command(USER_ID, "/start").await;
    ctx.click(USER_ID, "nav:menu").await;
    ctx.click(USER_ID, "nav:help").await;
    ctx.click(USER_ID, "nav:settings").await;
    assert_eq!(ctx.nav_stack(USER_ID).await.len(), 3);

    ctx.click(USER_ID, "nav:home").await;
    assert_eq!(ctx.current_screen(USER_ID).await, HOME);
    assert!(ctx.nav_stack(USER_ID).await.is_empty());
}

#[tokio::test]
async fn test_stack_keeps_only_the_newest_entries() {
    let ctx = TestContext::new().await;
    ctx.command(USER_ID, "/start").await;

    // home -> menu -> help -> menu -> ... pushes one entry per step
    for i in 0..30 {
        let target = if i % 2 == 0 { MENU } else { HELP };
        ctx.click(USER_ID, &format!("nav:{}", target)).await;
    }

    let stack = ctx.nav_stack(USER_ID).await;
    assert_eq!(stack.len(), NAV_STACK_LIMIT);
    assert!(!stack.contains(&HOME.to_string()), "oldest entry must be dropped");
    // The last push was the screen shown before the final click
    assert_eq!(stack.last().map(String::as_str), Some(MENU));
}

#[tokio::test]
async fn test_banned_user_cannot_navigate() {
    let ctx = TestContext::new().await;
    ctx.command(USER_ID, "/start").await;
    ctx.click(USER_ID, "nav:menu").await;
    ban(&ctx, USER_ID).await;

    ctx.click(USER_ID, "nav:settings").await;

    assert_eq!(ctx.current_screen(USER_ID).await, MENU);
    assert_eq!(ctx.nav_stack(USER_ID).await, vec![HOME]);
    assert_eq!(ctx.messenger.last_sent().text, ctx.t("common.banned"));
}

#[tokio::test]
async fn test_banned_root_admin_still_navigates() {
    let ctx = TestContext::new().await;
    ctx.app
        .database
        .update_profile(ROOT_ADMIN_ID, ProfileUpdate::banned(true))
        .await
        .unwrap();

    ctx.command(ROOT_ADMIN_ID, "/menu").await;
    assert_eq!(ctx.current_screen(ROOT_ADMIN_ID).await, MENU);
}

#[tokio::test]
async fn test_unknown_screen_changes_nothing() {
    let ctx = TestContext::new().await;
    ctx.command(USER_ID, "/start").await;
    ctx.click(USER_ID, "nav:menu").await;
    let sent_before = ctx.messenger.sent_count();

    let outcome = ctx
        .app
        .navigation
        .show_screen(USER_ID, USER_ID, "no_such_screen", Transition::PUSH)
        .await
        .unwrap();

    assert_matches!(outcome, NavOutcome::UnknownScreen(screen) if screen == "no_such_screen");
    assert_eq!(ctx.current_screen(USER_ID).await, MENU);
    assert_eq!(ctx.nav_stack(USER_ID).await, vec![HOME]);
    assert_eq!(ctx.messenger.sent_count(), sent_before);
}

#[tokio::test]
async fn test_previous_ui_message_is_replaced() {
    let ctx = TestContext::new().await;
    ctx.command(USER_ID, "/start").await;
    let first = ctx.messenger.last_sent().message;

    ctx.click(USER_ID, "nav:menu").await;
    let second = ctx.messenger.last_sent().message;

    assert_ne!(first, second);
    assert_eq!(ctx.messenger.deleted(), vec![first]);
    assert_eq!(ctx.profile(USER_ID).await.last_ui_message(), Some(second));
}

#[tokio::test]
async fn test_only_the_last_message_survives() {
    let ctx = TestContext::new().await;
    ctx.command(USER_ID, "/start").await;
    for data in ["nav:menu", "nav:help", "nav:back", "nav:settings", "nav:home"] {
        ctx.click(USER_ID, data).await;
    }

    let sent: Vec<_> = ctx.messenger.sent().into_iter().map(|m| m.message).collect();
    let deleted = ctx.messenger.deleted();
    let (last, earlier) = sent.split_last().unwrap();

    assert!(earlier.iter().all(|m| deleted.contains(m)));
    assert!(!deleted.contains(last));
    assert_eq!(ctx.profile(USER_ID).await.last_ui_message(), Some(*last));
}

#[tokio::test]
async fn test_failed_delete_still_records_new_message() {
    let ctx = TestContext::new().await;
    ctx.command(USER_ID, "/start").await;
    ctx.messenger.fail_deletes(true);

    ctx.click(USER_ID, "nav:help").await;

    let latest = ctx.messenger.last_sent().message;
    assert_eq!(ctx.profile(USER_ID).await.last_ui_message(), Some(latest));
    assert_eq!(ctx.current_screen(USER_ID).await, HELP);
}

#[tokio::test]
async fn test_render_reports_credential_status() {
    let ctx = TestContext::new().await;
    let profile = ctx.app.database.ensure(USER_ID).await.unwrap();

    let rendered = ctx.app.navigation.render(&profile, HOME).await.unwrap();
    assert!(rendered.text.contains(&ctx.t("po.not_set")));

    store_credentials(&ctx, USER_ID).await;
    let rendered = ctx.app.navigation.render(&profile, HOME).await.unwrap();
    assert!(rendered.text.contains(&ctx.t("po.set")));

    assert!(ctx.app.navigation.render(&profile, "missing").await.is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_stack_never_exceeds_limit(steps in proptest::collection::vec(0usize..4, 0..60)) {
        let stack_len = tokio_test::block_on(async {
            let ctx = TestContext::new().await;
            ctx.command(USER_ID, "/start").await;
            for step in steps {
                let data = match step {
                    0 => "nav:menu",
                    1 => "nav:help",
                    2 => "nav:settings",
                    _ => "nav:back",
                };
                ctx.click(USER_ID, data).await;
            }
            ctx.nav_stack(USER_ID).await.len()
        });
        prop_assert!(stack_len <= NAV_STACK_LIMIT);
    }
}
