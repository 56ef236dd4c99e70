//! Near-duplicate message detection ("copyright protection").
//!
//! Keeps a bounded window of recent message texts per chat and flags new
//! messages whose normalized Levenshtein similarity to any stored text
//! crosses the configured threshold. Protection is toggleable per chat and
//! defaults to enabled.

use std::collections::{HashMap, VecDeque};
use strsim::normalized_levenshtein;
use teloxide::types::{ChatId, MessageId};

/// A stored message that a new message was found too similar to
#[derive(Debug, Clone, PartialEq)]
pub struct CopyrightHit {
    /// Id of the earlier, original message
    pub original: MessageId,
    /// Similarity ratio in `0.0..=1.0`
    pub similarity: f64,
}

/// Per-chat duplicate-message guard with a bounded history window
#[derive(Debug)]
pub struct CopyrightGuard {
    threshold: f64,
    history_cap: usize,
    enabled: HashMap<ChatId, bool>,
    history: HashMap<ChatId, VecDeque<(MessageId, String)>>,
}

impl CopyrightGuard {
    /// Creates a guard flagging messages at or above `threshold` similarity,
    /// remembering at most `history_cap` messages per chat.
    #[must_use]
    pub fn new(threshold: f64, history_cap: usize) -> Self {
        Self {
            threshold,
            history_cap,
            enabled: HashMap::new(),
            history: HashMap::new(),
        }
    }

    /// Returns whether protection is active for a chat. Defaults to enabled.
    #[must_use]
    pub fn is_enabled(&self, chat: ChatId) -> bool {
        self.enabled.get(&chat).copied().unwrap_or(true)
    }

    /// Flips protection for a chat and returns the new state.
    pub fn toggle(&mut self, chat: ChatId) -> bool {
        let next = !self.is_enabled(chat);
        self.enabled.insert(chat, next);
        next
    }

    /// Checks `text` against the chat history.
    ///
    /// Returns a [`CopyrightHit`] when a stored message is at least
    /// `threshold`-similar; otherwise stores the message and evicts the
    /// oldest entry beyond the history cap. Disabled chats are never checked
    /// and never recorded.
    pub fn inspect(&mut self, chat: ChatId, message: MessageId, text: &str) -> Option<CopyrightHit> {
        if !self.is_enabled(chat) {
            return None;
        }

        let window = self.history.entry(chat).or_default();
        for (original, stored) in window.iter() {
            let similarity = normalized_levenshtein(text, stored);
            if similarity >= self.threshold {
                return Some(CopyrightHit {
                    original: *original,
                    similarity,
                });
            }
        }

        window.push_back((message, text.to_string()));
        if window.len() > self.history_cap {
            window.pop_front();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAT: ChatId = ChatId(-100);

    #[test]
    fn identical_message_is_flagged() {
        let mut guard = CopyrightGuard::new(0.85, 100);
        assert!(guard.inspect(CHAT, MessageId(1), "buy my course today").is_none());

        let hit = guard
            .inspect(CHAT, MessageId(2), "buy my course today")
            .expect("duplicate should be flagged");
        assert_eq!(hit.original, MessageId(1));
        assert!(hit.similarity > 0.99);
    }

    #[test]
    fn near_duplicate_is_flagged() {
        let mut guard = CopyrightGuard::new(0.85, 100);
        guard.inspect(CHAT, MessageId(1), "congratulations, you won a free prize");
        let hit = guard.inspect(CHAT, MessageId(2), "congratulations, you won a free prize!");
        assert!(hit.is_some());
    }

    #[test]
    fn dissimilar_message_is_stored_not_flagged() {
        let mut guard = CopyrightGuard::new(0.85, 100);
        guard.inspect(CHAT, MessageId(1), "good morning everyone");
        assert!(guard
            .inspect(CHAT, MessageId(2), "does anyone know the meetup time?")
            .is_none());
    }

    #[test]
    fn toggle_disables_and_reenables_checks() {
        let mut guard = CopyrightGuard::new(0.85, 100);
        guard.inspect(CHAT, MessageId(1), "repeated text");

        assert!(!guard.toggle(CHAT));
        assert!(guard.inspect(CHAT, MessageId(2), "repeated text").is_none());

        assert!(guard.toggle(CHAT));
        assert!(guard.inspect(CHAT, MessageId(3), "repeated text").is_some());
    }

    #[test]
    fn history_window_evicts_oldest() {
        let mut guard = CopyrightGuard::new(0.85, 2);
        guard.inspect(CHAT, MessageId(1), "first message");
        guard.inspect(CHAT, MessageId(2), "second message");
        guard.inspect(CHAT, MessageId(3), "third message");

        // The first message fell out of the window, so repeating it is clean
        assert!(guard.inspect(CHAT, MessageId(4), "first message").is_none());
    }

    #[test]
    fn chats_have_independent_histories() {
        let mut guard = CopyrightGuard::new(0.85, 100);
        guard.inspect(CHAT, MessageId(1), "cross-posted text");
        assert!(guard
            .inspect(ChatId(-200), MessageId(2), "cross-posted text")
            .is_none());
    }
}
