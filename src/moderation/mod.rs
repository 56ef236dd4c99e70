//! Moderation core: warning ledger, approval workflow, autoreplies and the
//! copyright guard.
//!
//! Nothing in this module performs I/O. Platform identity lookups go through
//! the [`roles::RoleResolver`] trait so the whole workflow is testable without
//! a live Telegram connection.

/// Keyword-to-response autoreply matcher
pub mod autoreply;
/// Near-duplicate message detection
pub mod copyright;
/// Error taxonomy for moderation operations
pub mod error;
/// Per-user warning and approval state
pub mod ledger;
/// URL and mention extraction from bio text
pub mod links;
/// Capability-check interface for command authorization
pub mod roles;
/// Static role resolvers for tests and examples
pub mod testing;
/// High-level moderation operations combining roles and ledger
pub mod workflow;

pub use error::ModerationError;
pub use workflow::{BioScanOutcome, Moderator};
