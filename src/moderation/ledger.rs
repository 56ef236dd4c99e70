//! Per-user warning and approval state.
//!
//! The ledger is the only mutable state of the warning workflow: one
//! [`UserBioState`] per `(chat, user)` pair, created lazily on the first bio
//! scan and kept for the lifetime of the process. All methods are synchronous
//! and cheap; callers hold the surrounding lock only for the duration of a
//! single transition.

use std::collections::{HashMap, HashSet};
use teloxide::types::{ChatId, UserId};

/// Warning and approval state for one user in one chat.
///
/// The linear chain is `Unseen -> Flagged(1) -> Flagged(2) -> Muted`, with
/// `approved` as an absorbing exemption reachable from any point of the chain.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UserBioState {
    /// A bio scan has detected a URL-like pattern at least once
    pub has_link: bool,
    /// Admin-granted exemption; warnings stop accruing while set
    pub approved: bool,
    /// Number of warnings issued; never exceeds the ledger limit
    pub warning_count: u8,
    /// The warning limit was reached and the mute side effect was requested
    pub muted: bool,
}

/// Result of recording one unapproved-link detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkVerdict {
    /// User is approved; nothing counted
    Exempt,
    /// A warning was issued
    Warned {
        /// Warnings issued so far
        count: u8,
        /// Warning limit of this ledger
        limit: u8,
    },
    /// The warning limit was crossed with this detection; mute exactly once
    Muted {
        /// Final warning count (equals the limit)
        count: u8,
    },
    /// User was already muted by an earlier detection; no re-mute
    AlreadyMuted,
}

/// Tracks warnings and approvals per `(chat, user)` pair
#[derive(Debug)]
pub struct WarningLedger {
    limit: u8,
    states: HashMap<(ChatId, UserId), UserBioState>,
}

impl WarningLedger {
    /// Creates an empty ledger with the given warning limit.
    #[must_use]
    pub fn new(limit: u8) -> Self {
        Self {
            limit,
            states: HashMap::new(),
        }
    }

    /// Records one link detection for an unapproved user.
    ///
    /// Increments the warning counter only while the user is not approved and
    /// not yet muted. Crossing the limit flips `muted` and yields
    /// [`LinkVerdict::Muted`] exactly once; later detections yield
    /// [`LinkVerdict::AlreadyMuted`] without touching the counter.
    pub fn record_link_detection(&mut self, chat: ChatId, user: UserId) -> LinkVerdict {
        let state = self.states.entry((chat, user)).or_default();
        state.has_link = true;

        if state.approved {
            return LinkVerdict::Exempt;
        }
        if state.muted {
            return LinkVerdict::AlreadyMuted;
        }

        state.warning_count += 1;
        if state.warning_count >= self.limit {
            state.muted = true;
            LinkVerdict::Muted {
                count: state.warning_count,
            }
        } else {
            LinkVerdict::Warned {
                count: state.warning_count,
                limit: self.limit,
            }
        }
    }

    /// Marks a user as approved and zeroes their warning counter.
    ///
    /// Approval is absorbing: there is no un-approval operation, only
    /// [`Self::reset`] re-enters the warning chain without clearing the flag.
    pub fn approve(&mut self, chat: ChatId, user: UserId) {
        let state = self.states.entry((chat, user)).or_default();
        state.approved = true;
        state.warning_count = 0;
    }

    /// Resets the warning counter and the muted flag for a user.
    pub fn reset(&mut self, chat: ChatId, user: UserId) {
        let state = self.states.entry((chat, user)).or_default();
        state.warning_count = 0;
        state.muted = false;
    }

    /// Returns the recorded state for a user, if any scan has seen them.
    #[must_use]
    pub fn state(&self, chat: ChatId, user: UserId) -> Option<&UserBioState> {
        self.states.get(&(chat, user))
    }

    /// Returns the configured warning limit.
    #[must_use]
    pub const fn limit(&self) -> u8 {
        self.limit
    }
}

/// Per-chat sticker allowances granted by `/approve_sticker`
#[derive(Debug, Default)]
pub struct StickerPermissions {
    allowed: HashSet<(ChatId, UserId)>,
}

impl StickerPermissions {
    /// Allows a user to post stickers in a chat.
    pub fn grant(&mut self, chat: ChatId, user: UserId) {
        self.allowed.insert((chat, user));
    }

    /// Returns true if the user has an explicit sticker allowance.
    #[must_use]
    pub fn is_allowed(&self, chat: ChatId, user: UserId) -> bool {
        self.allowed.contains(&(chat, user))
    }
}
