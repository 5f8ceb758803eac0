/// Commands the UI sends down to the dashboard runtime.
#[derive(Debug, Clone)]
pub enum DashboardCommand {
    OpenChat,
    CloseChat,
    /// Admin only: switch the conversation to this directory entry.
    SelectTarget {
        user_id: String,
    },
    /// The UI keeps its draft until `MessageSent` comes back.
    SendMessage(String),
    OpenNotifications,
    CloseNotifications,
    LoadMoreNotifications,
    SignOut,
}
