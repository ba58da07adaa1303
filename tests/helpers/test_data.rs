//! Shared test identities and helpers

use signal_ui_bot::models::{Plan, ProfileUpdate};

use super::test_context::TestContext;

pub const ROOT_ADMIN_ID: i64 = 1000;
pub const ADMIN_ID: i64 = 2000;
pub const USER_ID: i64 = 42;
pub const OTHER_USER_ID: i64 = 43;

pub const TEST_LOGIN: &str = "trader@example.com";
pub const TEST_PASSWORD: &str = "s3cret-pass";

/// Give a user a plan directly in the store
pub async fn grant_plan(ctx: &TestContext, user_id: i64, plan: Plan) {
    ctx.app
        .database
        .update_profile(user_id, ProfileUpdate::plan(plan))
        .await
        .expect("Failed to set plan");
}

/// Store the stored-admin flag for a user
pub async fn make_admin(ctx: &TestContext, user_id: i64) {
    ctx.app
        .database
        .update_profile(user_id, ProfileUpdate::admin(true))
        .await
        .expect("Failed to set admin flag");
}

pub async fn ban(ctx: &TestContext, user_id: i64) {
    ctx.app
        .database
        .update_profile(user_id, ProfileUpdate::banned(true))
        .await
        .expect("Failed to ban");
}

/// Store encrypted login/password for a user
pub async fn store_credentials(ctx: &TestContext, user_id: i64) {
    let login_enc = ctx.app.cipher.encrypt(TEST_LOGIN).unwrap();
    let password_enc = ctx.app.cipher.encrypt(TEST_PASSWORD).unwrap();
    ctx.app
        .database
        .save_credentials(user_id, &login_enc, &password_enc)
        .await
        .expect("Failed to store credentials");
}
