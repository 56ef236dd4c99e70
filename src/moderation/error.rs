use thiserror::Error;

/// Errors that can occur during moderation operations
#[derive(Debug, Error)]
pub enum ModerationError {
    /// The caller lacks the role required by the command
    #[error("permission denied: {0}")]
    PermissionDenied(&'static str),
    /// Malformed command argument, e.g. a non-numeric user id
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// An outbound Telegram API call failed
    #[error("platform request failed: {0}")]
    Platform(#[from] teloxide::RequestError),
}

impl ModerationError {
    /// Message shown to the invoking chat when an operation is rejected.
    ///
    /// Permission and argument errors get the exact wording users expect;
    /// platform errors are surfaced as a generic failure notice.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::PermissionDenied(_) => {
                "You don't have permission to use this command.".to_string()
            }
            Self::InvalidArgument(reason) => reason.clone(),
            Self::Platform(_) => "Telegram request failed. Please try again later.".to_string(),
        }
    }
}
