pub mod directory;
pub mod session;

use thiserror::Error;

use crate::network::ApiError;

pub use directory::AdminDirectory;
pub use session::{CHAT_POLL_PERIOD, ChatSession};

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("no live session")]
    NotAuthenticated,
    #[error("only admins can choose a chat counterpart")]
    Forbidden,
    #[error("`{0}` is not in the chat directory")]
    UnknownUser(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    /// Nothing to send, or nobody to send it to; no request was made.
    Skipped,
}
