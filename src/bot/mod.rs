/// Join, message, sticker and edited-message event handlers
pub mod events;
/// Command definitions and command handlers
pub mod handlers;
/// Role resolution against the Bot API with a cached admin roster
pub mod roles;
/// Shared dispatcher state
pub mod state;

pub use roles::BotRoleResolver;
pub use state::AppState;
