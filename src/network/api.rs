use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::common::{ChatUser, Message, Notification, Role};

use super::error::ApiError;

/// Body of a create-message request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub to_id: String,
    pub to_role: Role,
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MessagesResponse {
    #[serde(default)]
    pub messages: Vec<serde_json::Value>,
}

impl MessagesResponse {
    /// Rows that do not decode are skipped so one bad row cannot stall the conversation.
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<Message>(row) {
                Ok(message) => Some(message),
                Err(err) => {
                    log::debug!("Skipping undecodable message row: {err}");
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DirectoryResponse {
    #[serde(default)]
    pub users: Vec<ChatUser>,
}

/// One page of the notification listing plus the global unseen count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPage {
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub unseen_count: u64,
}

/// Backend operations the controllers depend on.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Full message set for the conversation with `counterpart_id`.
    async fn fetch_messages(&self, counterpart_id: &str) -> Result<Vec<Message>, ApiError>;

    async fn send_message(&self, message: &OutgoingMessage) -> Result<(), ApiError>;

    /// Non-admin accounts an admin can chat with.
    async fn fetch_directory(&self) -> Result<Vec<ChatUser>, ApiError>;

    async fn fetch_notifications(&self, page: u32, limit: u32)
    -> Result<NotificationPage, ApiError>;

    async fn mark_seen(&self, ids: &[String]) -> Result<(), ApiError>;
}
