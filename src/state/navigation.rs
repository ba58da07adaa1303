//! Navigation engine
//!
//! Tracks which screen each user is on and how they got there, renders screens
//! from the registry, and keeps exactly one live interactive message per user.

use std::sync::Arc;

use tracing::{debug, info};

use crate::database::DatabaseService;
use crate::i18n::{I18n, TranslationParams};
use crate::models::{CurrentScreen, MessageRef, NavStack, ProfileUpdate, UserProfile};
use crate::services::auth::AuthService;
use crate::services::messenger::{Button, Keyboard, Messenger};
use crate::state::screens::{self, Field, Label, ScreenDescriptor, HOME};
use crate::utils::errors::{Result, UiBotError};

/// How a transition treats the navigation stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Push the pre-transition screen so `back` can return to it
    pub push_current: bool,
    /// Empty the stack before anything else
    pub clear_stack: bool,
}

impl Transition {
    /// Forward navigation
    pub const PUSH: Transition = Transition { push_current: true, clear_stack: false };
    /// Redraw or return without recording history
    pub const REPLACE: Transition = Transition { push_current: false, clear_stack: false };
    /// Jump home and forget history
    pub const RESET: Transition = Transition { push_current: false, clear_stack: true };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    Shown { screen: String },
    /// The user is banned; only the restriction notice was sent
    Banned,
    /// The target is not in the registry; nothing changed
    UnknownScreen(String),
}

/// Rendered screen content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedScreen {
    pub text: String,
    pub keyboard: Keyboard,
}

#[derive(Clone)]
pub struct NavigationEngine {
    database: DatabaseService,
    auth: AuthService,
    i18n: Arc<I18n>,
    messenger: Arc<dyn Messenger>,
}

impl NavigationEngine {
    pub fn new(database: DatabaseService, auth: AuthService, i18n: Arc<I18n>, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            database,
            auth,
            i18n,
            messenger,
        }
    }

    /// Move a user to `target` and redraw their interactive message
    pub async fn show_screen(&self, user_id: i64, chat_id: i64, target: &str, transition: Transition) -> Result<NavOutcome> {
        let profile = self.database.ensure(user_id).await?;

        if profile.is_banned && !self.auth.is_root_admin(user_id) {
            self.send_banned(&profile, chat_id).await?;
            return Ok(NavOutcome::Banned);
        }

        let Some(descriptor) = screens::find(target) else {
            debug!(user_id, screen = target, "Ignoring navigation to unknown screen");
            return Ok(NavOutcome::UnknownScreen(target.to_string()));
        };

        if transition.clear_stack {
            self.database.save(user_id, &NavStack::new()).await?;
        }

        let current: CurrentScreen = self.database.load(user_id).await?;
        if transition.push_current && current.0 != target {
            let mut stack: NavStack = self.database.load(user_id).await?;
            stack.push(current.0);
            self.database.save(user_id, &stack).await?;
        }

        self.database.save(user_id, &CurrentScreen(target.to_string())).await?;

        let rendered = self.render_descriptor(&profile, descriptor).await?;
        self.send_ui(user_id, chat_id, &rendered.text, Some(&rendered.keyboard)).await?;

        info!(user_id, screen = target, "Screen shown");
        Ok(NavOutcome::Shown { screen: target.to_string() })
    }

    /// Return to the previous screen, or home when there is none
    pub async fn back(&self, user_id: i64, chat_id: i64) -> Result<NavOutcome> {
        let profile = self.database.ensure(user_id).await?;
        if profile.is_banned && !self.auth.is_root_admin(user_id) {
            self.send_banned(&profile, chat_id).await?;
            return Ok(NavOutcome::Banned);
        }

        let mut stack: NavStack = self.database.load(user_id).await?;
        match stack.pop() {
            Some(previous) if screens::is_known(&previous) => {
                self.database.save(user_id, &stack).await?;
                self.show_screen(user_id, chat_id, &previous, Transition::REPLACE).await
            }
            _ => self.home(user_id, chat_id).await,
        }
    }

    pub async fn home(&self, user_id: i64, chat_id: i64) -> Result<NavOutcome> {
        self.show_screen(user_id, chat_id, HOME, Transition::RESET).await
    }

    /// Render `screen` for the profile without changing any state
    pub async fn render(&self, profile: &UserProfile, screen: &str) -> Result<RenderedScreen> {
        let descriptor = screens::find(screen).ok_or_else(|| UiBotError::UnknownScreen(screen.to_string()))?;
        self.render_descriptor(profile, descriptor).await
    }

    async fn render_descriptor(&self, profile: &UserProfile, descriptor: &ScreenDescriptor) -> Result<RenderedScreen> {
        let lang = profile.language.code();
        let stack: NavStack = self.database.load(profile.user_id).await?;

        let mut params = TranslationParams::new();
        for field in descriptor.fields {
            let value = match field {
                Field::UserId => profile.user_id.to_string(),
                Field::Language => profile.language.code().to_string(),
                Field::Currency => profile.currency.code().to_string(),
                Field::Plan => self.i18n.t(&format!("plans.{}", profile.plan.code()), lang, None),
                Field::PoStatus => {
                    let configured = self
                        .database
                        .get_credentials(profile.user_id)
                        .await?
                        .is_some_and(|record| record.is_configured());
                    let key = if configured { "po.set" } else { "po.not_set" };
                    self.i18n.t(key, lang, None)
                }
            };
            params.insert(field.param_name().to_string(), value);
        }

        let text = format!(
            "<b>{}</b>\n\n{}",
            self.i18n.t(descriptor.title_key, lang, None),
            self.i18n.t(descriptor.body_key, lang, Some(&params))
        );

        let mut keyboard = Keyboard::new();
        for row in descriptor.rows {
            let buttons = row
                .iter()
                .map(|spec| {
                    let text = match spec.label {
                        Label::Key(key) => self.i18n.t(key, lang, None),
                        Label::Literal(text) => text.to_string(),
                    };
                    Button::callback(text, spec.action)
                })
                .collect();
            keyboard = keyboard.row(buttons);
        }

        let is_home = descriptor.id == HOME;
        keyboard = keyboard.row(self.nav_row(lang, !stack.is_empty() && !is_home, !is_home));

        Ok(RenderedScreen { text, keyboard })
    }

    /// Back/home controls
    pub fn nav_row(&self, lang: &str, show_back: bool, show_home: bool) -> Vec<Button> {
        let mut row = Vec::new();
        if show_back {
            row.push(Button::callback(self.i18n.t("nav.back", lang, None), "nav:back"));
        }
        if show_home {
            row.push(Button::callback(self.i18n.t("nav.home", lang, None), "nav:home"));
        }
        row
    }

    /// Replace the user's interactive message with a new one
    ///
    /// Deleting the previous message is best-effort; the recorded locator
    /// always points at the message sent here.
    pub async fn send_ui(&self, user_id: i64, chat_id: i64, text: &str, keyboard: Option<&Keyboard>) -> Result<MessageRef> {
        let profile = self.database.get_profile(user_id).await?;
        if let Some(previous) = profile.last_ui_message() {
            if let Err(e) = self.messenger.delete_message(previous).await {
                debug!(user_id, error = %e, "Previous UI message already gone");
            }
        }

        let sent = self.messenger.send_message(chat_id, text, keyboard).await?;
        self.database
            .update_profile(user_id, ProfileUpdate::last_ui_message(sent))
            .await?;
        Ok(sent)
    }

    /// Translate `key` for the user's language and send it as the UI message
    pub async fn send_text(&self, user_id: i64, chat_id: i64, key: &str, params: Option<&TranslationParams>, keyboard: Option<&Keyboard>) -> Result<MessageRef> {
        let profile = self.database.get_profile(user_id).await?;
        let text = self.i18n.t(key, profile.language.code(), params);
        self.send_ui(user_id, chat_id, &text, keyboard).await
    }

    async fn send_banned(&self, profile: &UserProfile, chat_id: i64) -> Result<()> {
        let text = self.i18n.t("common.banned", profile.language.code(), None);
        self.send_ui(profile.user_id, chat_id, &text, None).await?;
        debug!(user_id = profile.user_id, "Banned user blocked from navigation");
        Ok(())
    }
}
