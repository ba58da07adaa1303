//! User profile model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ru,
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::En => "en",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ru" => Ok(Language::Ru),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Display currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Rub,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Rub => "RUB",
        }
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "RUB" => Ok(Currency::Rub),
            other => Err(format!("unsupported currency: {}", other)),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Subscription plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Long,
    Short,
    Vip,
    Pro,
}

impl Plan {
    pub fn code(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Long => "long",
            Plan::Short => "short",
            Plan::Vip => "vip",
            Plan::Pro => "pro",
        }
    }

    /// Plans that can be bought through the payment flow
    pub fn is_purchasable(&self) -> bool {
        matches!(self, Plan::Long | Plan::Short | Plan::Vip)
    }

    pub fn is_paid(&self) -> bool {
        !matches!(self, Plan::Free)
    }
}

impl FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Plan::Free),
            "long" => Ok(Plan::Long),
            "short" => Ok(Plan::Short),
            "vip" => Ok(Plan::Vip),
            "pro" => Ok(Plan::Pro),
            other => Err(format!("unknown plan: {}", other)),
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Locator of a message sent through the messaging gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i32,
}

impl MessageRef {
    pub fn new(chat_id: i64, message_id: i32) -> Self {
        Self { chat_id, message_id }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub user_id: i64,
    pub language: Language,
    pub currency: Currency,
    pub plan: Plan,
    pub is_admin: bool,
    pub is_banned: bool,
    pub last_ui_chat_id: Option<i64>,
    pub last_ui_message_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// The last interactive message, when both halves of the locator are recorded
    pub fn last_ui_message(&self) -> Option<MessageRef> {
        match (self.last_ui_chat_id, self.last_ui_message_id) {
            (Some(chat_id), Some(message_id)) => Some(MessageRef::new(chat_id, message_id)),
            _ => None,
        }
    }
}

/// Allow-listed partial profile update
///
/// Deserializing from arbitrary JSON silently drops fields outside the allow-list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub plan: Option<Plan>,
    #[serde(default)]
    pub is_admin: Option<bool>,
    #[serde(default)]
    pub is_banned: Option<bool>,
    #[serde(default)]
    pub last_ui_message: Option<MessageRef>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &ProfileUpdate::default()
    }

    pub fn language(language: Language) -> Self {
        Self { language: Some(language), ..Default::default() }
    }

    pub fn currency(currency: Currency) -> Self {
        Self { currency: Some(currency), ..Default::default() }
    }

    pub fn plan(plan: Plan) -> Self {
        Self { plan: Some(plan), ..Default::default() }
    }

    pub fn banned(is_banned: bool) -> Self {
        Self { is_banned: Some(is_banned), ..Default::default() }
    }

    pub fn admin(is_admin: bool) -> Self {
        Self { is_admin: Some(is_admin), ..Default::default() }
    }

    pub fn last_ui_message(message: MessageRef) -> Self {
        Self { last_ui_message: Some(message), ..Default::default() }
    }
}
