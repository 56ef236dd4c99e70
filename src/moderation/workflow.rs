//! High-level moderation operations.
//!
//! [`Moderator`] is the context object injected into every handler: it owns
//! the warning ledger and sticker allowances, and authorizes each operation
//! through the [`RoleResolver`] before mutating any state. Rejected calls
//! leave the ledger untouched.

use crate::moderation::error::ModerationError;
use crate::moderation::ledger::{LinkVerdict, StickerPermissions, UserBioState, WarningLedger};
use crate::moderation::links;
use crate::moderation::roles::RoleResolver;
use std::sync::Arc;
use teloxide::types::{ChatId, UserId};
use tokio::sync::Mutex;
use tracing::info;

/// Outcome of scanning a joining member's bio
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BioScanOutcome {
    /// No URL-like pattern in the bio
    Clean,
    /// Links found but the user is exempt (admin, approved or already muted)
    Skipped,
    /// A warning was issued
    Warned {
        /// Warnings issued so far
        count: u8,
        /// Configured warning limit
        limit: u8,
        /// The links found in the bio
        links: Vec<String>,
    },
    /// The warning limit was crossed; the caller must issue the mute
    Muted {
        /// Final warning count
        count: u8,
        /// The links found in the bio
        links: Vec<String>,
    },
}

/// Warning ledger and approval workflow behind a capability check
pub struct Moderator {
    roles: Arc<dyn RoleResolver>,
    ledger: Mutex<WarningLedger>,
    stickers: Mutex<StickerPermissions>,
}

impl Moderator {
    /// Creates a moderator with the given role resolver and warning limit.
    #[must_use]
    pub fn new(roles: Arc<dyn RoleResolver>, warning_limit: u8) -> Self {
        Self {
            roles,
            ledger: Mutex::new(WarningLedger::new(warning_limit)),
            stickers: Mutex::new(StickerPermissions::default()),
        }
    }

    /// Scans a joining member's bio text for links and records a warning.
    ///
    /// Admins and approved users are never warned; a muted user is not warned
    /// again until reset.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationError::Platform`] if the role lookup fails.
    pub async fn scan_bio(
        &self,
        chat: ChatId,
        user: UserId,
        bio: &str,
    ) -> Result<BioScanOutcome, ModerationError> {
        let found = links::extract_links(bio);
        if found.is_empty() {
            return Ok(BioScanOutcome::Clean);
        }

        if self.roles.role_of(chat, user).await?.is_admin() {
            info!("skipping bio check for admin user {}", user);
            return Ok(BioScanOutcome::Skipped);
        }

        let verdict = self.ledger.lock().await.record_link_detection(chat, user);
        Ok(match verdict {
            LinkVerdict::Exempt | LinkVerdict::AlreadyMuted => BioScanOutcome::Skipped,
            LinkVerdict::Warned { count, limit } => BioScanOutcome::Warned {
                count,
                limit,
                links: found,
            },
            LinkVerdict::Muted { count } => BioScanOutcome::Muted {
                count,
                links: found,
            },
        })
    }

    /// Approves a user's bio link, stopping all further warnings.
    ///
    /// # Errors
    ///
    /// [`ModerationError::PermissionDenied`] unless the caller is an admin.
    pub async fn approve(
        &self,
        chat: ChatId,
        caller: UserId,
        target: UserId,
    ) -> Result<(), ModerationError> {
        self.require_admin(chat, caller).await?;
        self.ledger.lock().await.approve(chat, target);
        info!("user {} approved in chat {} by {}", target, chat, caller);
        Ok(())
    }

    /// Resets a user's warning counter and muted flag.
    ///
    /// # Errors
    ///
    /// [`ModerationError::PermissionDenied`] unless the caller is an admin.
    pub async fn reset_warnings(
        &self,
        chat: ChatId,
        caller: UserId,
        target: UserId,
    ) -> Result<(), ModerationError> {
        self.require_admin(chat, caller).await?;
        self.ledger.lock().await.reset(chat, target);
        info!("warnings reset for {} in chat {} by {}", target, chat, caller);
        Ok(())
    }

    /// Authorizes `/delete` and `/copyright` style admin commands.
    ///
    /// # Errors
    ///
    /// [`ModerationError::PermissionDenied`] unless the caller is an admin.
    pub async fn require_admin(&self, chat: ChatId, caller: UserId) -> Result<(), ModerationError> {
        if self.roles.role_of(chat, caller).await?.is_admin() {
            Ok(())
        } else {
            Err(ModerationError::PermissionDenied("admin role required"))
        }
    }

    /// Grants a sticker allowance. Bot owner and group owner only.
    ///
    /// # Errors
    ///
    /// [`ModerationError::PermissionDenied`] for anyone else, admins included.
    pub async fn approve_sticker(
        &self,
        chat: ChatId,
        caller: UserId,
        target: UserId,
    ) -> Result<(), ModerationError> {
        if !self.roles.role_of(chat, caller).await?.is_group_owner() {
            return Err(ModerationError::PermissionDenied("group owner role required"));
        }
        self.stickers.lock().await.grant(chat, target);
        info!("sticker allowance for {} in chat {} by {}", target, chat, caller);
        Ok(())
    }

    /// Whether a user may post stickers: owner, group owner or approved.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationError::Platform`] if the role lookup fails.
    pub async fn sticker_allowed(&self, chat: ChatId, user: UserId) -> Result<bool, ModerationError> {
        if self.roles.role_of(chat, user).await?.is_group_owner() {
            return Ok(true);
        }
        Ok(self.stickers.lock().await.is_allowed(chat, user))
    }

    /// Whether a user may edit messages without them being removed.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationError::Platform`] if the role lookup fails.
    pub async fn may_edit(&self, chat: ChatId, user: UserId) -> Result<bool, ModerationError> {
        Ok(self.roles.role_of(chat, user).await?.is_admin())
    }

    /// Snapshot of a user's warning state, if any scan has seen them.
    pub async fn user_state(&self, chat: ChatId, user: UserId) -> Option<UserBioState> {
        self.ledger.lock().await.state(chat, user).cloned()
    }

    /// The role resolver backing this moderator.
    #[must_use]
    pub fn roles(&self) -> &Arc<dyn RoleResolver> {
        &self.roles
    }
}
