pub mod center;

use thiserror::Error;

use crate::network::ApiError;

pub use center::{BADGE_POLL_PERIOD, NOTIFICATION_PAGE_SIZE, NotificationCenter};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notifications require a live admin session")]
    NotAuthenticated,
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSummary {
    /// Entries on the freshly loaded first page.
    pub shown: usize,
    /// Entries submitted to mark-seen.
    pub marked: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
    Appended(usize),
    /// Pagination already ended; no request was made.
    Exhausted,
}
