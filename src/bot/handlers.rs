//! Command definitions and handlers.
//!
//! Permission and argument failures are reported back to the invoking chat;
//! only transport errors bubble up to the dispatcher wrappers.

use crate::bot::state::AppState;
use crate::moderation::error::ModerationError;
use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode, UserId};
use teloxide::utils::command::{BotCommands, ParseError};
use tracing::error;

/// Commands understood by the bot
#[derive(BotCommands, Clone)]
#[command(rename_rule = "snake_case", description = "Supported commands:")]
pub enum Command {
    /// `/start`
    #[command(description = "start the bot.")]
    Start,
    /// `/help`
    #[command(description = "show this help message.")]
    Help,
    /// `/info`
    #[command(description = "show bot information.")]
    Info,
    /// `/approve <user_id>`
    #[command(description = "approve a user's bio link (admin only).", parse_with = rest_arg)]
    Approve {
        /// Raw argument, parsed as a user id in the handler
        target: String,
    },
    /// `/reset_warnings <user_id>`
    #[command(description = "reset a user's warnings (admin only).", parse_with = rest_arg)]
    ResetWarnings {
        /// Raw argument, parsed as a user id in the handler
        target: String,
    },
    /// `/delete <reason>` as a reply to the offending message
    #[command(description = "delete the replied-to message (admin only).", parse_with = rest_arg)]
    Delete {
        /// Free-form deletion reason, may be empty
        reason: String,
    },
    /// `/approve_sticker <user_id>`
    #[command(description = "allow a user to post stickers (group owner only).", parse_with = rest_arg)]
    ApproveSticker {
        /// Raw argument, parsed as a user id in the handler
        target: String,
    },
    /// `/copyright`
    #[command(description = "toggle copyright protection (admin only).")]
    Copyright,
}

/// Accepts the raw argument tail verbatim, empty included, so the handler
/// can answer with a proper usage message instead of silently not matching.
fn rest_arg(input: String) -> Result<(String,), ParseError> {
    Ok((input.trim().to_owned(),))
}

const START_TEXT: &str =
    "Hi! I am Bio-Guard. I monitor user bios for links and help maintain group rules.";

const HELP_TEXT: &str = "🤖 <b>Bio-Guard Help</b>\n\n\
<b>Commands:</b>\n\
/start - Start the bot\n\
/help - Show this help message\n\
/info - Show bot information\n\
/approve &lt;user_id&gt; - Approve a user's bio link (Admin only)\n\
/reset_warnings &lt;user_id&gt; - Reset user warnings (Admin only)\n\
/delete &lt;reason&gt; - Delete the replied-to message (Admin only)\n\
/approve_sticker &lt;user_id&gt; - Allow a user to post stickers (Group owner only)\n\
/copyright - Toggle copyright protection (Admin only)\n\n\
<b>Features:</b>\n\
• Monitors user bios for links\n\
• Warns users with links in bio\n\
• Auto-mutes after repeated warnings\n\
• Admin approval system\n\
• Automatic responses to common queries";

const INFO_TEXT: &str = "🤖 <b>Bot Information</b>\n\n\
Bio-Guard: bio-link moderation for Telegram groups.\n\
Warnings, approvals and mutes are kept in memory for the process lifetime.";

/// `/start`
pub async fn start(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, START_TEXT).await?;
    Ok(())
}

/// `/help`
pub async fn help(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, HELP_TEXT)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// `/info`
pub async fn info(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, INFO_TEXT)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// `/approve <user_id>`
pub async fn approve(bot: Bot, msg: Message, state: Arc<AppState>, target: &str) -> Result<()> {
    let Some(caller) = msg.from.as_ref() else {
        return Ok(());
    };

    let reply = match approve_target(&state, msg.chat.id, caller.id, target).await {
        Ok(user) => format!("User {user} has been approved."),
        Err(e) => e.user_message(),
    };
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn approve_target(
    state: &AppState,
    chat: ChatId,
    caller: UserId,
    arg: &str,
) -> Result<UserId, ModerationError> {
    let target = parse_user_id(arg)?;
    state.moderator.approve(chat, caller, target).await?;
    Ok(target)
}

/// `/reset_warnings <user_id>`
pub async fn reset_warnings(
    bot: Bot,
    msg: Message,
    state: Arc<AppState>,
    target: &str,
) -> Result<()> {
    let Some(caller) = msg.from.as_ref() else {
        return Ok(());
    };

    let reply = match reset_target(&state, msg.chat.id, caller.id, target).await {
        Ok(user) => format!("Warnings for user {user} have been reset."),
        Err(e) => e.user_message(),
    };
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn reset_target(
    state: &AppState,
    chat: ChatId,
    caller: UserId,
    arg: &str,
) -> Result<UserId, ModerationError> {
    let target = parse_user_id(arg)?;
    state.moderator.reset_warnings(chat, caller, target).await?;
    Ok(target)
}

/// `/delete <reason>`, replying to the message to remove
pub async fn delete(bot: Bot, msg: Message, state: Arc<AppState>, reason: &str) -> Result<()> {
    let Some(caller) = msg.from.as_ref() else {
        return Ok(());
    };
    let chat = msg.chat.id;

    let Some(target) = msg.reply_to_message() else {
        bot.send_message(chat, "Please reply to the message you want to delete.")
            .await?;
        return Ok(());
    };

    if let Err(e) = state.moderator.require_admin(chat, caller.id).await {
        bot.send_message(chat, e.user_message()).await?;
        return Ok(());
    }

    let reason = if reason.trim().is_empty() {
        "No reason provided".to_string()
    } else {
        reason.trim().to_string()
    };
    state.record_deletion(chat, target.id, reason.clone()).await;

    match bot.delete_message(chat, target.id).await {
        Ok(_) => {
            bot.send_message(chat, format!("Message deleted.\nReason: {reason}"))
                .await?;
        }
        Err(e) => {
            error!("failed to delete message {} in {}: {}", target.id, chat, e);
            bot.send_message(chat, "Failed to delete the message.").await?;
        }
    }
    Ok(())
}

/// `/approve_sticker <user_id>`
pub async fn approve_sticker(
    bot: Bot,
    msg: Message,
    state: Arc<AppState>,
    target: &str,
) -> Result<()> {
    let Some(caller) = msg.from.as_ref() else {
        return Ok(());
    };

    let reply = match sticker_target(&state, msg.chat.id, caller.id, target).await {
        Ok(user) => format!("User {user} has been approved to send stickers."),
        Err(ModerationError::PermissionDenied(_)) => {
            "Only the group owner can approve users for stickers.".to_string()
        }
        Err(e) => e.user_message(),
    };
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn sticker_target(
    state: &AppState,
    chat: ChatId,
    caller: UserId,
    arg: &str,
) -> Result<UserId, ModerationError> {
    let target = parse_user_id(arg)?;
    state.moderator.approve_sticker(chat, caller, target).await?;
    Ok(target)
}

/// `/copyright`
pub async fn toggle_copyright(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<()> {
    let Some(caller) = msg.from.as_ref() else {
        return Ok(());
    };
    let chat = msg.chat.id;

    let reply = match state.moderator.require_admin(chat, caller.id).await {
        Ok(()) => {
            let enabled = state.copyright.lock().await.toggle(chat);
            let status = if enabled { "enabled" } else { "disabled" };
            format!("Copyright protection has been {status} for this chat.")
        }
        Err(_) => "Only admins can toggle copyright protection.".to_string(),
    };
    bot.send_message(chat, reply).await?;
    Ok(())
}

fn parse_user_id(arg: &str) -> Result<UserId, ModerationError> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(ModerationError::InvalidArgument(
            "Please provide a user ID.".to_string(),
        ));
    }
    arg.parse::<u64>()
        .map(UserId)
        .map_err(|_| ModerationError::InvalidArgument("Invalid user ID provided.".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numeric_user_id() {
        assert!(matches!(parse_user_id(" 123456 "), Ok(UserId(123_456))));
    }

    #[test]
    fn rejects_missing_and_malformed_ids() {
        assert!(matches!(
            parse_user_id(""),
            Err(ModerationError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_user_id("@username"),
            Err(ModerationError::InvalidArgument(_))
        ));
        assert!(matches!(
            parse_user_id("-5"),
            Err(ModerationError::InvalidArgument(_))
        ));
    }

    #[test]
    fn rest_arg_accepts_empty_input() {
        let (arg,) = rest_arg(String::new()).expect("empty input is valid");
        assert!(arg.is_empty());
        let (arg,) = rest_arg("  42 ".to_string()).expect("valid input");
        assert_eq!(arg, "42");
    }
}
