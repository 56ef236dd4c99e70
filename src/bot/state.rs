//! Shared dispatcher state.
//!
//! One [`AppState`] is built at startup and injected into every handler via
//! `dptree::deps!`. All moderation state lives here; nothing is module-global.

use crate::bot::roles::BotRoleResolver;
use crate::config::Settings;
use crate::moderation::copyright::CopyrightGuard;
use crate::moderation::roles::RoleResolver;
use crate::moderation::workflow::Moderator;
use std::collections::HashMap;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId, UserId};
use tokio::sync::Mutex;

/// Everything the handlers share: workflow, guards and bookkeeping maps
pub struct AppState {
    /// Role resolver, kept concrete so join handling can force a refresh
    pub roles: Arc<BotRoleResolver>,
    /// Warning ledger and approval workflow
    pub moderator: Moderator,
    /// Near-duplicate message guard
    pub copyright: Mutex<CopyrightGuard>,
    /// Reasons recorded by `/delete`, keyed by the deleted message
    pub deletion_reasons: Mutex<HashMap<(ChatId, MessageId), String>>,
    /// Warning notices sent so far, mapping notice message to the warned user
    pub warning_notices: Mutex<HashMap<(ChatId, MessageId), UserId>>,
    /// Mute duration in hours, from settings
    pub mute_hours: i64,
}

impl AppState {
    /// Builds the state from settings, wiring the moderator to a role
    /// resolver backed by `bot`.
    #[must_use]
    pub fn new(bot: Bot, settings: &Settings) -> Self {
        let roles = Arc::new(BotRoleResolver::new(bot, settings.bot_owner_id));
        let moderator = Moderator::new(
            roles.clone() as Arc<dyn RoleResolver>,
            settings.max_warnings,
        );

        Self {
            roles,
            moderator,
            copyright: Mutex::new(CopyrightGuard::new(
                settings.copyright_similarity,
                settings.copyright_history,
            )),
            deletion_reasons: Mutex::new(HashMap::new()),
            warning_notices: Mutex::new(HashMap::new()),
            mute_hours: settings.mute_hours,
        }
    }

    /// Records which user a warning notice refers to.
    pub async fn remember_warning_notice(&self, chat: ChatId, notice: MessageId, user: UserId) {
        self.warning_notices.lock().await.insert((chat, notice), user);
    }

    /// Looks up the warned user behind a notice message, if it is one.
    pub async fn warned_user_for(&self, chat: ChatId, notice: MessageId) -> Option<UserId> {
        self.warning_notices.lock().await.get(&(chat, notice)).copied()
    }

    /// Records the reason a message was deleted with `/delete`.
    pub async fn record_deletion(&self, chat: ChatId, message: MessageId, reason: String) {
        self.deletion_reasons
            .lock()
            .await
            .insert((chat, message), reason);
    }
}
