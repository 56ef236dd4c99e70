//! Configuration and settings management
//!
//! Loads settings from environment variables and defines moderation defaults.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token (`TELEGRAM_BOT_TOKEN`)
    telegram_bot_token: Option<String>,

    /// Alternative token variable (`BOT_TOKEN`), checked second
    bot_token: Option<String>,

    /// Telegram user id of the bot owner; passes every permission check
    pub bot_owner_id: Option<u64>,

    /// Warnings before a user is muted
    #[serde(default = "default_max_warnings")]
    pub max_warnings: u8,

    /// Mute duration in hours
    #[serde(default = "default_mute_hours")]
    pub mute_hours: i64,

    /// Similarity ratio at which a message counts as copied
    #[serde(default = "default_copyright_similarity")]
    pub copyright_similarity: f64,

    /// Messages remembered per chat for the copyright check
    #[serde(default = "default_copyright_history")]
    pub copyright_history: usize,
}

const fn default_max_warnings() -> u8 {
    3
}

const fn default_mute_hours() -> i64 {
    24
}

const fn default_copyright_similarity() -> f64 {
    0.85
}

const fn default_copyright_history() -> usize {
    100
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails or no bot token is set
    /// under either `TELEGRAM_BOT_TOKEN` or `BOT_TOKEN`.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            // Local overrides, not checked into git
            .add_source(File::with_name("config/local").required(false))
            // Environment::default() auto-converts UPPER_SNAKE_CASE to snake_case;
            // ignore_empty treats empty env vars as unset
            .add_source(Environment::default().ignore_empty(true))
            .build()?;

        let mut settings: Self = s.try_deserialize()?;

        // Fallback: check the env directly in case automatic mapping missed it
        if settings.telegram_bot_token.is_none() {
            if let Ok(val) = std::env::var("TELEGRAM_BOT_TOKEN") {
                if !val.is_empty() {
                    settings.telegram_bot_token = Some(val);
                }
            }
        }
        if settings.bot_token.is_none() {
            if let Ok(val) = std::env::var("BOT_TOKEN") {
                if !val.is_empty() {
                    settings.bot_token = Some(val);
                }
            }
        }

        if settings.telegram_bot_token.is_none() && settings.bot_token.is_none() {
            return Err(ConfigError::Message(
                "no bot token configured: set TELEGRAM_BOT_TOKEN or BOT_TOKEN".to_string(),
            ));
        }

        Ok(settings)
    }

    /// Returns the bot token, preferring `TELEGRAM_BOT_TOKEN` over `BOT_TOKEN`.
    #[must_use]
    pub fn telegram_token(&self) -> &str {
        self.telegram_bot_token
            .as_deref()
            .or(self.bot_token.as_deref())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    // Env-mutating cases live in a single test to avoid races between
    // parallel test threads.
    #[test]
    fn test_token_env_loading() -> Result<(), Box<dyn std::error::Error>> {
        // 1. Primary variable wins
        env::set_var("TELEGRAM_BOT_TOKEN", "primary_token");
        env::set_var("BOT_TOKEN", "fallback_token");

        let settings = Settings::new()?;
        assert_eq!(settings.telegram_token(), "primary_token");

        // 2. Fallback variable alone is enough
        env::remove_var("TELEGRAM_BOT_TOKEN");
        let settings = Settings::new()?;
        assert_eq!(settings.telegram_token(), "fallback_token");

        // 3. Neither set is a startup error
        env::remove_var("BOT_TOKEN");
        assert!(Settings::new().is_err());

        // 4. Empty vars are treated as unset
        env::set_var("TELEGRAM_BOT_TOKEN", "");
        assert!(Settings::new().is_err());
        env::remove_var("TELEGRAM_BOT_TOKEN");

        Ok(())
    }

    #[test]
    fn test_moderation_defaults() {
        let settings = Settings {
            telegram_bot_token: Some("dummy".to_string()),
            bot_token: None,
            bot_owner_id: None,
            max_warnings: default_max_warnings(),
            mute_hours: default_mute_hours(),
            copyright_similarity: default_copyright_similarity(),
            copyright_history: default_copyright_history(),
        };

        assert_eq!(settings.max_warnings, 3);
        assert_eq!(settings.mute_hours, 24);
        assert!((settings.copyright_similarity - 0.85).abs() < f64::EPSILON);
        assert_eq!(settings.copyright_history, 100);
    }
}
