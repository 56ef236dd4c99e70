//! Role resolution against the Telegram Bot API.
//!
//! Keeps a per-chat admin roster cached in memory; the roster is refreshed
//! explicitly when a member joins and lazily on first lookup for a chat.

use crate::moderation::error::ModerationError;
use crate::moderation::roles::{Role, RoleResolver};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use teloxide::prelude::*;
use teloxide::types::{ChatId, UserId};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Cached administrator set of one chat
#[derive(Debug, Default, Clone)]
struct AdminRoster {
    owner: Option<UserId>,
    admins: HashSet<UserId>,
}

/// [`RoleResolver`] backed by `getChatAdministrators`
pub struct BotRoleResolver {
    bot: Bot,
    owner_id: Option<UserId>,
    rosters: Mutex<HashMap<ChatId, AdminRoster>>,
}

impl BotRoleResolver {
    /// Creates a resolver for `bot`, with an optional fixed bot-owner id.
    #[must_use]
    pub fn new(bot: Bot, owner_id: Option<u64>) -> Self {
        Self {
            bot,
            owner_id: owner_id.map(UserId),
            rosters: Mutex::new(HashMap::new()),
        }
    }

    /// Re-queries the admin list of `chat` and replaces the cached roster.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationError::Platform`] if the API call fails; the stale
    /// roster, if any, is kept in that case.
    pub async fn refresh(&self, chat: ChatId) -> Result<(), ModerationError> {
        let members = self.bot.get_chat_administrators(chat).await?;

        let mut roster = AdminRoster::default();
        for member in &members {
            if member.is_owner() {
                roster.owner = Some(member.user.id);
            }
            roster.admins.insert(member.user.id);
        }
        debug!("admin roster for {}: {} admins", chat, roster.admins.len());

        self.rosters.lock().await.insert(chat, roster);
        Ok(())
    }

    async fn roster(&self, chat: ChatId) -> Result<AdminRoster, ModerationError> {
        if let Some(roster) = self.rosters.lock().await.get(&chat) {
            return Ok(roster.clone());
        }
        if let Err(e) = self.refresh(chat).await {
            warn!("admin roster refresh failed for {}: {}", chat, e);
            return Err(e);
        }
        Ok(self
            .rosters
            .lock()
            .await
            .get(&chat)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl RoleResolver for BotRoleResolver {
    async fn role_of(&self, chat: ChatId, user: UserId) -> Result<Role, ModerationError> {
        if self.owner_id == Some(user) {
            return Ok(Role::Owner);
        }
        let roster = self.roster(chat).await?;
        if roster.owner == Some(user) {
            Ok(Role::GroupOwner)
        } else if roster.admins.contains(&user) {
            Ok(Role::Admin)
        } else {
            Ok(Role::Member)
        }
    }

    async fn admin_ids(&self, chat: ChatId) -> Result<Vec<UserId>, ModerationError> {
        let roster = self.roster(chat).await?;
        let mut ids: Vec<UserId> = roster.admins.into_iter().collect();
        ids.sort_by_key(|u| u.0);
        Ok(ids)
    }
}
