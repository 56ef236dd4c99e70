//! Bio-Guard: a Telegram group moderation bot.
//!
//! Scans the profile biography of joining members for URL-like links, issues
//! counted warnings, mutes at a configurable threshold and lets admins grant
//! exemptions. Also gates stickers, removes edited messages, answers common
//! questions and deletes near-duplicate ("copyright") messages.
//!
//! The crate is split into a transport-independent [`moderation`] core and the
//! Telegram-facing [`bot`] layer on top of it.

/// Telegram-facing handlers, dispatcher state and role resolution
pub mod bot;
/// Configuration and settings management
pub mod config;
/// Transport-independent moderation core
pub mod moderation;
