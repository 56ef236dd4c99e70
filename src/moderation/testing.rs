//! Testing helpers: a role resolver backed by a static table.
//!
//! Lets workflow and authorization logic be exercised without a live
//! Telegram connection, as integration tests cannot use the mock generated
//! under `cfg(test)`.

use crate::moderation::error::ModerationError;
use crate::moderation::roles::{Role, RoleResolver};
use async_trait::async_trait;
use std::collections::HashSet;
use teloxide::types::{ChatId, UserId};

/// Role resolver answering from a fixed table
#[derive(Debug, Default)]
pub struct StaticRoles {
    owner: Option<UserId>,
    group_owners: HashSet<(ChatId, UserId)>,
    admins: HashSet<(ChatId, UserId)>,
}

impl StaticRoles {
    /// Creates an empty table where everyone is a plain member.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bot owner.
    #[must_use]
    pub fn with_owner(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Marks a user as the creator of a chat.
    #[must_use]
    pub fn with_group_owner(mut self, chat: ChatId, user: UserId) -> Self {
        self.group_owners.insert((chat, user));
        self.admins.insert((chat, user));
        self
    }

    /// Marks a user as an administrator of a chat.
    #[must_use]
    pub fn with_admin(mut self, chat: ChatId, user: UserId) -> Self {
        self.admins.insert((chat, user));
        self
    }
}

#[async_trait]
impl RoleResolver for StaticRoles {
    async fn role_of(&self, chat: ChatId, user: UserId) -> Result<Role, ModerationError> {
        if self.owner == Some(user) {
            return Ok(Role::Owner);
        }
        if self.group_owners.contains(&(chat, user)) {
            return Ok(Role::GroupOwner);
        }
        if self.admins.contains(&(chat, user)) {
            return Ok(Role::Admin);
        }
        Ok(Role::Member)
    }

    async fn admin_ids(&self, chat: ChatId) -> Result<Vec<UserId>, ModerationError> {
        let mut ids: Vec<UserId> = self
            .admins
            .iter()
            .filter(|(c, _)| *c == chat)
            .map(|(_, u)| *u)
            .collect();
        ids.sort_by_key(|u| u.0);
        Ok(ids)
    }
}
