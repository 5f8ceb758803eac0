use beehive_dashboard::common::{
    ChatUser, ConversationKey, DashboardEvent, Identity, Message, Notification, Role,
};

/// UI-side mirror of the core's state, rebuilt from events.
pub struct AppState {
    pub viewer_id: Option<String>,
    pub viewer_name: String,
    pub role: Option<Role>,
    pub chat_open: bool,
    pub conversation: Option<ConversationKey>,
    pub messages: Vec<Message>,
    pub input_text: String,
    pub sending: bool,
    pub users: Vec<ChatUser>,
    pub selected_user: Option<ChatUser>,
    pub unseen_count: u64,
    pub panel_open: bool,
    pub notifications: Vec<Notification>,
    pub has_more: bool,
    pub last_error: Option<String>,
    pub signed_out: bool,
}

impl AppState {
    pub fn new(identity: Option<Identity>) -> Self {
        let viewer_name = identity
            .as_ref()
            .map(|identity| {
                identity
                    .display_name
                    .clone()
                    .unwrap_or_else(|| identity.subject_id.clone())
            })
            .unwrap_or_default();
        Self {
            viewer_id: identity.as_ref().map(|identity| identity.subject_id.clone()),
            viewer_name,
            role: identity.as_ref().map(|identity| identity.role),
            chat_open: false,
            conversation: None,
            messages: Vec::new(),
            input_text: String::new(),
            sending: false,
            users: Vec::new(),
            selected_user: None,
            unseen_count: 0,
            panel_open: false,
            notifications: Vec::new(),
            has_more: false,
            last_error: None,
            signed_out: false,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    pub fn is_mine(&self, message: &Message) -> bool {
        self.viewer_id.as_deref() == Some(message.from_id.as_str())
    }

    /// Admins cannot type until a counterpart is selected.
    pub fn can_send(&self) -> bool {
        !self.sending && !self.signed_out && self.conversation.is_some()
    }

    pub fn apply(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::ConversationChanged(key) => {
                self.messages.clear();
                self.conversation = key;
            }
            DashboardEvent::MessagesReplaced { key, messages } => {
                if self.conversation.as_ref() == Some(&key) {
                    self.messages = messages;
                }
            }
            DashboardEvent::DirectoryLoaded(users) => {
                if let Some(selected) = &self.selected_user {
                    if !users.iter().any(|user| user.id == selected.id) {
                        self.selected_user = None;
                    }
                }
                self.users = users;
            }
            DashboardEvent::TargetSelected(user) => self.selected_user = Some(user),
            DashboardEvent::MessageSent => {
                self.sending = false;
                self.input_text.clear();
                self.last_error = None;
            }
            DashboardEvent::SendFailed(reason) => {
                self.sending = false;
                self.last_error = Some(reason);
            }
            DashboardEvent::BadgeUpdated(count) => self.unseen_count = count,
            DashboardEvent::NotificationsReplaced { items, has_more } => {
                self.notifications = items;
                self.has_more = has_more;
            }
            DashboardEvent::NotificationsAppended { mut items, has_more } => {
                self.notifications.append(&mut items);
                self.has_more = has_more;
            }
            DashboardEvent::NotificationsFailed(reason) => self.last_error = Some(reason),
            DashboardEvent::SignedOut => {
                self.signed_out = true;
                self.chat_open = false;
                self.panel_open = false;
                self.conversation = None;
                self.messages.clear();
                self.unseen_count = 0;
            }
        }
    }

    pub fn chat_title(&self) -> String {
        if self.is_admin() {
            match &self.selected_user {
                Some(user) => format!("Chat with {}", user.label()),
                None => "Chat".to_string(),
            }
        } else {
            "Chat with Admin".to_string()
        }
    }
}
