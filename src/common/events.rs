use tokio::sync::mpsc;

use crate::common::types::{ChatUser, ConversationKey, Message, Notification};

/// Events the dashboard runtime pushes up to the UI.
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// Conversation switched (or closed, when `None`); the message list was cleared.
    ConversationChanged(Option<ConversationKey>),
    MessagesReplaced {
        key: ConversationKey,
        messages: Vec<Message>,
    },
    DirectoryLoaded(Vec<ChatUser>),
    TargetSelected(ChatUser),
    MessageSent,
    SendFailed(String),
    BadgeUpdated(u64),
    NotificationsReplaced {
        items: Vec<Notification>,
        has_more: bool,
    },
    NotificationsAppended {
        items: Vec<Notification>,
        has_more: bool,
    },
    NotificationsFailed(String),
    SignedOut,
}

/// Best-effort delivery; a closed UI channel is only logged.
pub(crate) async fn emit(events: &Option<mpsc::Sender<DashboardEvent>>, event: DashboardEvent) {
    if let Some(sender) = events {
        if let Err(err) = sender.send(event).await {
            log::warn!("Failed to deliver dashboard event: {err}");
        }
    }
}
