use crate::common::ChatUser;
use crate::network::{ApiError, DashboardApi};

/// Chattable accounts for an admin, plus the selected counterpart.
///
/// Fetched once in full; there is no paging.
#[derive(Debug, Default, Clone)]
pub struct AdminDirectory {
    users: Vec<ChatUser>,
    selected: Option<ChatUser>,
    loaded: bool,
}

impl AdminDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches the directory. A previous selection survives only if that user
    /// is still listed. When nothing is selected the first entry is selected
    /// and returned, so the caller can switch the conversation.
    pub async fn load(&mut self, api: &dyn DashboardApi) -> Result<Option<ChatUser>, ApiError> {
        let users = api.fetch_directory().await?;
        log::debug!("Directory loaded with {} users", users.len());
        self.users = users;
        self.loaded = true;

        if let Some(current) = &self.selected {
            match self.users.iter().find(|user| user.id == current.id) {
                Some(fresh) => {
                    self.selected = Some(fresh.clone());
                    return Ok(None);
                }
                None => {
                    log::debug!("Selected user {} left the directory", current.id);
                    self.selected = None;
                }
            }
        }
        let first = self.users.first().cloned();
        self.selected = first.clone();
        Ok(first)
    }

    /// Returns `true` when the selection actually changed.
    pub fn select(&mut self, user: ChatUser) -> bool {
        if self.selected.as_ref().is_some_and(|current| current.id == user.id) {
            return false;
        }
        self.selected = Some(user);
        true
    }

    pub fn selected(&self) -> Option<&ChatUser> {
        self.selected.as_ref()
    }

    pub fn users(&self) -> &[ChatUser] {
        &self.users
    }

    pub fn find(&self, id: &str) -> Option<&ChatUser> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Marks the listing stale so the next `load` re-fetches it.
    pub fn invalidate(&mut self) {
        self.loaded = false;
    }
}
