//! Messaging gateway
//!
//! The navigation engine and handlers talk to Telegram only through the
//! [`Messenger`] trait so the whole UI layer can run against a recording fake.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode};

use crate::models::MessageRef;
use crate::utils::errors::Result;

/// An inline button carrying a callback action token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub text: String,
    pub action: String,
}

impl Button {
    pub fn callback(text: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: action.into(),
        }
    }
}

/// Gateway-neutral inline keyboard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, row: Vec<Button>) -> Self {
        if !row.is_empty() {
            self.rows.push(row);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every action token on the keyboard, row by row
    pub fn actions(&self) -> Vec<&str> {
        self.rows
            .iter()
            .flat_map(|row| row.iter().map(|button| button.action.as_str()))
            .collect()
    }

    pub fn has_action(&self, action: &str) -> bool {
        self.actions().contains(&action)
    }
}

impl From<&Keyboard> for InlineKeyboardMarkup {
    fn from(keyboard: &Keyboard) -> Self {
        InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
            row.iter()
                .map(|button| InlineKeyboardButton::callback(button.text.clone(), button.action.clone()))
                .collect::<Vec<_>>()
        }))
    }
}

#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send an HTML message, optionally with an inline keyboard
    async fn send_message(&self, chat_id: i64, text: &str, keyboard: Option<&Keyboard>) -> Result<MessageRef>;

    async fn delete_message(&self, message: MessageRef) -> Result<()>;
}

/// [`Messenger`] over the Telegram Bot API
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_message(&self, chat_id: i64, text: &str, keyboard: Option<&Keyboard>) -> Result<MessageRef> {
        let mut request = self
            .bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::Html);
        if let Some(keyboard) = keyboard.filter(|k| !k.is_empty()) {
            request = request.reply_markup(InlineKeyboardMarkup::from(keyboard));
        }

        let message = request.await?;
        Ok(MessageRef::new(message.chat.id.0, message.id.0))
    }

    async fn delete_message(&self, message: MessageRef) -> Result<()> {
        self.bot
            .delete_message(ChatId(message.chat_id), MessageId(message.message_id))
            .await?;
        Ok(())
    }
}
