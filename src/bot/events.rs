//! Handlers for non-command updates: member joins, plain messages, stickers
//! and edits.

use crate::bot::state::AppState;
use crate::moderation::autoreply;
use crate::moderation::error::ModerationError;
use crate::moderation::roles::Role;
use crate::moderation::workflow::BioScanOutcome;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, ChatMemberUpdated, ChatPermissions, ParseMode, ReplyParameters, User, UserId,
};
use tracing::{error, info, warn};

fn mention(user: &User) -> String {
    user.username
        .as_ref()
        .map_or_else(|| user.first_name.clone(), |name| format!("@{name}"))
}

fn mention_html(user: &User) -> String {
    html_escape::encode_text(&mention(user)).into_owned()
}

/// Bio scan on member join.
///
/// Refreshes the cached admin roster first, then fetches the joining user's
/// bio and runs it through the warning workflow.
pub async fn on_chat_member(bot: Bot, upd: ChatMemberUpdated, state: Arc<AppState>) -> Result<()> {
    let joined = !upd.old_chat_member.is_present() && upd.new_chat_member.is_present();
    if !joined {
        return Ok(());
    }

    let user = upd.new_chat_member.user.clone();
    if user.is_bot {
        return Ok(());
    }
    let chat = upd.chat.id;
    info!("new member joined {}: {} (id {})", chat, user.full_name(), user.id);

    if let Err(e) = state.roles.refresh(chat).await {
        error!("failed to update admin roster for {}: {}", chat, e);
    }

    let user_chat = ChatId(user.id.0.cast_signed());
    let bio = match bot.get_chat(user_chat).await {
        Ok(full) => full.bio().map(ToOwned::to_owned),
        Err(e) => {
            error!("failed to fetch profile of {}: {}", user.id, e);
            bot.send_message(
                chat,
                format!(
                    "⚠️ Unable to check bio for {}. Please ensure the bot has permission to view user information.",
                    mention(&user)
                ),
            )
            .await?;
            return Ok(());
        }
    };
    let Some(bio) = bio else {
        return Ok(());
    };

    match state.moderator.scan_bio(chat, user.id, &bio).await? {
        BioScanOutcome::Clean | BioScanOutcome::Skipped => {}
        BioScanOutcome::Warned { count, limit, links } => {
            send_warning_notice(&bot, &state, chat, &user, count, limit, &links).await?;
        }
        BioScanOutcome::Muted { count, links } => {
            send_warning_notice(&bot, &state, chat, &user, count, count, &links).await?;
            mute_member(&bot, &state, chat, &user).await?;
        }
    }
    Ok(())
}

async fn send_warning_notice(
    bot: &Bot,
    state: &AppState,
    chat: ChatId,
    user: &User,
    count: u8,
    limit: u8,
    links: &[String],
) -> Result<()> {
    let listed = html_escape::encode_text(&links.join(", ")).into_owned();
    let text = format!(
        "⚠️ <b>Warning {count}/{limit}</b>\n{} has links in their bio:\nFound: {listed}\n\
         Please remove all links or reply to this message to request approval.",
        mention_html(user)
    );

    let notice = bot
        .send_message(chat, text)
        .parse_mode(ParseMode::Html)
        .await?;
    state.remember_warning_notice(chat, notice.id, user.id).await;
    Ok(())
}

async fn mute_member(bot: &Bot, state: &AppState, chat: ChatId, user: &User) -> Result<()> {
    let until = Utc::now() + chrono::Duration::hours(state.mute_hours);
    match bot
        .restrict_chat_member(chat, user.id, ChatPermissions::empty())
        .until_date(until)
        .await
    {
        Ok(_) => {
            bot.send_message(
                chat,
                format!(
                    "🚫 {} has been muted for {} hours due to repeated warnings.",
                    mention(user),
                    state.mute_hours
                ),
            )
            .await?;
        }
        Err(e) => {
            error!("failed to mute {} in {}: {}", user.id, chat, e);
            bot.send_message(
                chat,
                "Failed to mute the user. Please check the bot's permissions.",
            )
            .await?;
        }
    }
    Ok(())
}

/// Plain text messages: approval-request replies, the copyright guard and
/// keyword autoreplies, in that order.
pub async fn on_text(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<()> {
    let Some(text) = msg.text().map(ToOwned::to_owned) else {
        return Ok(());
    };
    let Some(from) = msg.from.clone() else {
        return Ok(());
    };
    let chat = msg.chat.id;

    if let Some(replied) = msg.reply_to_message() {
        if let Some(warned) = state.warned_user_for(chat, replied.id).await {
            return handle_warning_reply(&bot, &state, &msg, &from, warned).await;
        }
    }

    let role = state.moderator.roles().role_of(chat, from.id).await;
    if let Err(e) = &role {
        // Never demote on a failed lookup: an admin's message must not be
        // deleted because getChatAdministrators was briefly unavailable.
        warn!("role lookup failed in {}; skipping copyright check: {}", chat, e);
    }
    if copyright_check_applies(&role) {
        let hit = state.copyright.lock().await.inspect(chat, msg.id, &text);
        if let Some(hit) = hit {
            return handle_copyright_hit(&bot, chat, &msg, &from, hit.similarity).await;
        }
    }

    if let Some(reply) = autoreply::match_trigger(&text) {
        bot.send_message(chat, reply)
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;
    }
    Ok(())
}

/// What a reply to a warning notice should trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WarningReplyAction {
    /// An admin replied: approve the warned user.
    Approve,
    /// The warned user replied: forward an approval request to the admins.
    RequestApproval,
    /// Anyone else, or the sender's role could not be resolved.
    Ignore,
}

fn warning_reply_action(
    role: Result<Role, ModerationError>,
    from: UserId,
    warned: UserId,
) -> WarningReplyAction {
    match role {
        Ok(role) if role.is_admin() => WarningReplyAction::Approve,
        Ok(_) if from == warned => WarningReplyAction::RequestApproval,
        Ok(_) => WarningReplyAction::Ignore,
        // An unresolved role must not approve anyone, nor spam the admins.
        Err(_) => WarningReplyAction::Ignore,
    }
}

/// The copyright guard applies to everyone except the bot owner; when the
/// sender's role cannot be resolved the message is left alone rather than
/// treated as coming from an ordinary member.
fn copyright_check_applies(role: &Result<Role, ModerationError>) -> bool {
    matches!(role, Ok(role) if *role != Role::Owner)
}

async fn handle_warning_reply(
    bot: &Bot,
    state: &AppState,
    msg: &Message,
    from: &User,
    warned: UserId,
) -> Result<()> {
    let chat = msg.chat.id;
    let role = state.moderator.roles().role_of(chat, from.id).await;
    if let Err(e) = &role {
        warn!("role lookup failed in {}; ignoring warning reply: {}", chat, e);
    }

    match warning_reply_action(role, from.id, warned) {
        WarningReplyAction::Approve => {
            if let Err(e) = state.moderator.approve(chat, from.id, warned).await {
                warn!("approval via warning reply failed: {}", e);
                return Ok(());
            }
            bot.send_message(chat, "✅ User has been approved by admin.")
                .await?;
        }
        WarningReplyAction::RequestApproval => {
            bot.send_message(
                chat,
                "Your approval request has been sent to the admins. Please wait for their response.",
            )
            .await?;

            let admins = state
                .moderator
                .roles()
                .admin_ids(chat)
                .await
                .unwrap_or_default();
            for admin in admins {
                let dm = ChatId(admin.0.cast_signed());
                let text = format!(
                    "🔔 Approval request from user {} (ID: {})",
                    mention(from),
                    from.id
                );
                if let Err(e) = bot.send_message(dm, text).await {
                    warn!("failed to notify admin {}: {}", admin, e);
                }
            }
        }
        WarningReplyAction::Ignore => {}
    }
    Ok(())
}

async fn handle_copyright_hit(
    bot: &Bot,
    chat: ChatId,
    msg: &Message,
    from: &User,
    similarity: f64,
) -> Result<()> {
    if let Err(e) = bot.delete_message(chat, msg.id).await {
        error!("failed to delete copied message {} in {}: {}", msg.id, chat, e);
        return Ok(());
    }

    let percent = (similarity * 100.0).round() as u32;
    bot.send_message(
        chat,
        format!(
            "⚠️ <b>Copyright Alert</b>\n{}, this message is {percent}% similar to a previous message.\nPlease write more original content.",
            mention_html(from)
        ),
    )
    .parse_mode(ParseMode::Html)
    .await?;
    Ok(())
}

/// Stickers from anyone but the owner, group owner or an approved user are
/// removed.
pub async fn on_sticker(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<()> {
    if msg.sticker().is_none() {
        return Ok(());
    }
    let Some(from) = msg.from.clone() else {
        return Ok(());
    };
    let chat = msg.chat.id;

    match state.moderator.sticker_allowed(chat, from.id).await {
        Ok(true) => {}
        Ok(false) => {
            if let Err(e) = bot.delete_message(chat, msg.id).await {
                error!("failed to delete sticker in {}: {}", chat, e);
                return Ok(());
            }
            bot.send_message(
                chat,
                format!(
                    "{}, stickers require group owner approval. Please contact the group owner.",
                    mention(&from)
                ),
            )
            .await?;
        }
        Err(e) => warn!("sticker permission lookup failed in {}: {}", chat, e),
    }
    Ok(())
}

/// Edited messages from non-privileged users are removed without a warning.
pub async fn on_edited(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<()> {
    let Some(from) = msg.from.clone() else {
        return Ok(());
    };
    let chat = msg.chat.id;

    match state.moderator.may_edit(chat, from.id).await {
        Ok(true) => {}
        Ok(false) => {
            if let Err(e) = bot.delete_message(chat, msg.id).await {
                error!("failed to delete edited message in {}: {}", chat, e);
                return Ok(());
            }
            bot.send_message(
                chat,
                format!(
                    "{}, message editing is not allowed. Please send a new message instead.",
                    mention(&from)
                ),
            )
            .await?;
        }
        Err(e) => warn!("edit permission lookup failed in {}: {}", chat, e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_error() -> ModerationError {
        ModerationError::Platform(teloxide::RequestError::Api(teloxide::ApiError::Unknown(
            "admin list unavailable".to_string(),
        )))
    }

    #[test]
    fn admin_reply_approves_the_warned_user() {
        let action = warning_reply_action(Ok(Role::Admin), UserId(10), UserId(20));
        assert_eq!(action, WarningReplyAction::Approve);
    }

    #[test]
    fn warned_user_reply_requests_approval() {
        let action = warning_reply_action(Ok(Role::Member), UserId(20), UserId(20));
        assert_eq!(action, WarningReplyAction::RequestApproval);
    }

    #[test]
    fn bystander_reply_is_ignored() {
        let action = warning_reply_action(Ok(Role::Member), UserId(30), UserId(20));
        assert_eq!(action, WarningReplyAction::Ignore);
    }

    #[test]
    fn failed_role_lookup_never_approves() {
        // Even the warned user's own reply is dropped when the sender's role
        // is unknown, so a flaky admin list cannot trigger any action.
        let action = warning_reply_action(Err(lookup_error()), UserId(20), UserId(20));
        assert_eq!(action, WarningReplyAction::Ignore);
    }

    #[test]
    fn copyright_guard_skips_owner_and_unresolved_roles() {
        assert!(copyright_check_applies(&Ok(Role::Member)));
        assert!(copyright_check_applies(&Ok(Role::Admin)));
        assert!(!copyright_check_applies(&Ok(Role::Owner)));
        assert!(!copyright_check_applies(&Err(lookup_error())));
    }
}
