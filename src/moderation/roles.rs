//! Capability-check interface for command authorization.
//!
//! Privileged commands never query Telegram directly; they ask a
//! [`RoleResolver`] what the caller is allowed to do. The production resolver
//! talks to the Bot API, the test resolvers in [`crate::moderation::testing`]
//! answer from a static table.

use crate::moderation::error::ModerationError;
use async_trait::async_trait;
use teloxide::types::{ChatId, UserId};

/// What a user is, for authorization purposes, within one chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The bot owner, configured at startup; passes every check
    Owner,
    /// The creator of the group
    GroupOwner,
    /// A group administrator
    Admin,
    /// Everyone else
    Member,
}

impl Role {
    /// True for roles that may run admin commands (`/approve`,
    /// `/reset_warnings`, `/delete`, `/copyright`).
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Owner | Self::GroupOwner | Self::Admin)
    }

    /// True for roles that may grant sticker allowances.
    #[must_use]
    pub const fn is_group_owner(self) -> bool {
        matches!(self, Self::Owner | Self::GroupOwner)
    }
}

/// Resolves user roles and enumerates chat admins
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleResolver: Send + Sync {
    /// Role of `user` within `chat`.
    async fn role_of(&self, chat: ChatId, user: UserId) -> Result<Role, ModerationError>;

    /// User ids of all administrators of `chat`, owner included.
    async fn admin_ids(&self, chat: ChatId) -> Result<Vec<UserId>, ModerationError>;
}
