//! Authorization checks for privileged operations, exercised without a live
//! platform connection through the capability-check interface.

use bio_guard::moderation::error::ModerationError;
use bio_guard::moderation::roles::{Role, RoleResolver};
use bio_guard::moderation::testing::StaticRoles;
use bio_guard::moderation::workflow::Moderator;
use std::sync::Arc;
use teloxide::types::{ChatId, UserId};

const CHAT: ChatId = ChatId(-1_001_234);
const BOT_OWNER: UserId = UserId(1);
const GROUP_OWNER: UserId = UserId(2);
const ADMIN: UserId = UserId(3);
const MEMBER: UserId = UserId(4);
const TARGET: UserId = UserId(5);

fn full_roles() -> StaticRoles {
    StaticRoles::new()
        .with_owner(BOT_OWNER)
        .with_group_owner(CHAT, GROUP_OWNER)
        .with_admin(CHAT, ADMIN)
}

#[tokio::test]
async fn role_precedence_is_owner_group_owner_admin_member() {
    let roles = full_roles();
    assert_eq!(roles.role_of(CHAT, BOT_OWNER).await.expect("role"), Role::Owner);
    assert_eq!(
        roles.role_of(CHAT, GROUP_OWNER).await.expect("role"),
        Role::GroupOwner
    );
    assert_eq!(roles.role_of(CHAT, ADMIN).await.expect("role"), Role::Admin);
    assert_eq!(roles.role_of(CHAT, MEMBER).await.expect("role"), Role::Member);
}

#[tokio::test]
async fn admin_commands_accept_owner_group_owner_and_admin() {
    let m = Moderator::new(Arc::new(full_roles()), 3);
    for caller in [BOT_OWNER, GROUP_OWNER, ADMIN] {
        m.approve(CHAT, caller, TARGET).await.expect("admin approve");
        m.reset_warnings(CHAT, caller, TARGET)
            .await
            .expect("admin reset");
        m.require_admin(CHAT, caller).await.expect("admin delete");
    }
}

#[tokio::test]
async fn member_approve_and_reset_are_denied_without_state_change() {
    let m = Moderator::new(Arc::new(full_roles()), 3);
    m.scan_bio(CHAT, TARGET, "see http://spam.example.com")
        .await
        .expect("scan");

    let approve = m.approve(CHAT, MEMBER, TARGET).await;
    assert!(matches!(approve, Err(ModerationError::PermissionDenied(_))));

    let reset = m.reset_warnings(CHAT, MEMBER, TARGET).await;
    assert!(matches!(reset, Err(ModerationError::PermissionDenied(_))));

    let state = m.user_state(CHAT, TARGET).await.expect("state recorded");
    assert!(!state.approved);
    assert_eq!(state.warning_count, 1);
    assert!(!state.muted);
}

#[tokio::test]
async fn sticker_grants_are_group_owner_territory() {
    let m = Moderator::new(Arc::new(full_roles()), 3);

    // Plain admins and members are rejected
    for caller in [ADMIN, MEMBER] {
        let res = m.approve_sticker(CHAT, caller, TARGET).await;
        assert!(matches!(res, Err(ModerationError::PermissionDenied(_))));
    }
    assert!(!m.sticker_allowed(CHAT, TARGET).await.expect("lookup"));

    // Bot owner and group owner may grant
    m.approve_sticker(CHAT, GROUP_OWNER, TARGET)
        .await
        .expect("group owner grant");
    assert!(m.sticker_allowed(CHAT, TARGET).await.expect("lookup"));

    // Privileged roles post stickers without an explicit grant
    assert!(m.sticker_allowed(CHAT, BOT_OWNER).await.expect("lookup"));
    assert!(m.sticker_allowed(CHAT, GROUP_OWNER).await.expect("lookup"));
}

#[tokio::test]
async fn roles_do_not_leak_across_chats() {
    let other_chat = ChatId(-1_009_999);
    let roles = full_roles();

    assert_eq!(
        roles.role_of(other_chat, ADMIN).await.expect("role"),
        Role::Member
    );
    // The bot owner keeps the role everywhere
    assert_eq!(
        roles.role_of(other_chat, BOT_OWNER).await.expect("role"),
        Role::Owner
    );
}
