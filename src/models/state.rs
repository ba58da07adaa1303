//! Typed per-user state entries
//!
//! Every state blob persisted under a `(user_id, key)` pair has a named type
//! here, bound to its key through [`StateEntry`]. Application code never
//! touches the raw JSON.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::user::Plan;

/// A typed value stored under a fixed state key
pub trait StateEntry: Serialize + DeserializeOwned + Default + Send + Sync {
    const KEY: &'static str;
}

/// Maximum number of remembered screens
pub const NAV_STACK_LIMIT: usize = 20;

/// Back-navigation history, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavStack(Vec<String>);

impl NavStack {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Push onto the tail, dropping the oldest entries beyond the limit
    pub fn push(&mut self, screen: impl Into<String>) {
        self.0.push(screen.into());
        if self.0.len() > NAV_STACK_LIMIT {
            let excess = self.0.len() - NAV_STACK_LIMIT;
            self.0.drain(..excess);
        }
    }

    pub fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }
}

impl StateEntry for NavStack {
    const KEY: &'static str = "nav_stack";
}

/// The screen most recently shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrentScreen(pub String);

impl Default for CurrentScreen {
    fn default() -> Self {
        Self(crate::state::screens::HOME.to_string())
    }
}

impl StateEntry for CurrentScreen {
    const KEY: &'static str = "current_screen";
}

/// A payment awaiting confirmation; `None` when nothing is pending
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingPayment(pub Option<PendingPaymentInfo>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingPaymentInfo {
    pub payment_id: String,
    pub plan: Plan,
    pub amount: f64,
    pub currency: String,
}

impl StateEntry for PendingPayment {
    const KEY: &'static str = "pending_payment";
}

/// Admin action waiting for its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    Ban,
    Unban,
    Reset,
    SetPlan,
}

impl AdminAction {
    pub fn code(&self) -> &'static str {
        match self {
            AdminAction::Ban => "ban",
            AdminAction::Unban => "unban",
            AdminAction::Reset => "reset",
            AdminAction::SetPlan => "set_plan",
        }
    }
}

impl FromStr for AdminAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ban" => Ok(AdminAction::Ban),
            "unban" => Ok(AdminAction::Unban),
            "reset" => Ok(AdminAction::Reset),
            "set_plan" => Ok(AdminAction::SetPlan),
            other => Err(format!("unknown admin action: {}", other)),
        }
    }
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Two-step admin input: `idle -> awaiting_target -> idle`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AdminFlow {
    #[default]
    Idle,
    AwaitingTarget { action: AdminAction },
}

impl StateEntry for AdminFlow {
    const KEY: &'static str = "admin_flow";
}

/// Step-by-step broker credential capture
///
/// Only ciphertext is ever held between steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PoFlow {
    #[default]
    Idle,
    AwaitingLogin,
    AwaitingPassword { login_enc: String },
}

impl StateEntry for PoFlow {
    const KEY: &'static str = "po_flow";
}
