pub mod commands;
pub mod events;
pub mod types;

pub use commands::DashboardCommand;
pub use events::DashboardEvent;
pub use types::{
    ADMIN_RECIPIENT_ID, ChatUser, ConversationKey, Identity, Message, Notification, Role,
};
