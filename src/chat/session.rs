//! One active conversation and its polling loop.
//!
//! States: idle until a counterpart is known, then active with exactly one
//! armed [`Poller`]. Switching counterparts disarms the old poller, clears
//! the message list and arms a new one; closing (or dropping the session)
//! disarms it for good.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};

use crate::common::events::emit;
use crate::common::types::sort_chronologically;
use crate::common::{
    ADMIN_RECIPIENT_ID, ChatUser, ConversationKey, DashboardEvent, Identity, Message, Role,
};
use crate::network::{DashboardApi, OutgoingMessage, Poller};
use crate::session::IdentityStore;

use super::directory::AdminDirectory;
use super::{ChatError, SendOutcome};

pub const CHAT_POLL_PERIOD: Duration = Duration::from_secs(5);

#[derive(Debug, Default)]
struct Conversation {
    key: Option<ConversationKey>,
    /// Bumped on every switch/close; fetches carry the epoch they were issued under.
    epoch: u64,
    messages: Vec<Message>,
}

#[derive(Clone)]
struct FetchContext {
    api: Arc<dyn DashboardApi>,
    identity: IdentityStore,
    conversation: Arc<Mutex<Conversation>>,
    events: Option<mpsc::Sender<DashboardEvent>>,
}

impl FetchContext {
    /// Replaces the whole message list with the server's view.
    async fn fetch(&self, key: ConversationKey, epoch: u64) {
        let mut messages = match self.api.fetch_messages(&key.counterpart_id).await {
            Ok(messages) => messages,
            Err(err) => {
                // The previous list stays until a later tick succeeds.
                log::debug!("Chat fetch for {} failed: {err}", key.counterpart_id);
                return;
            }
        };

        if !self.identity.is_live() {
            log::debug!("Dropping chat fetch: session is no longer live");
            return;
        }
        sort_chronologically(&mut messages);

        {
            let mut conversation = self.conversation.lock().await;
            if conversation.epoch != epoch {
                log::debug!(
                    "Dropping chat fetch for superseded conversation with {}",
                    key.counterpart_id
                );
                return;
            }
            conversation.messages = messages.clone();
        }

        emit(&self.events, DashboardEvent::MessagesReplaced { key, messages }).await;
    }
}

pub struct ChatSession {
    ctx: FetchContext,
    period: Duration,
    viewer: Option<Identity>,
    directory: AdminDirectory,
    poller: Option<Poller>,
}

impl ChatSession {
    pub fn new(api: Arc<dyn DashboardApi>, identity: IdentityStore, period: Duration) -> Self {
        Self {
            ctx: FetchContext {
                api,
                identity,
                conversation: Arc::new(Mutex::new(Conversation::default())),
                events: None,
            },
            period,
            viewer: None,
            directory: AdminDirectory::new(),
            poller: None,
        }
    }

    pub fn with_events(mut self, events: mpsc::Sender<DashboardEvent>) -> Self {
        self.ctx.events = Some(events);
        self
    }

    /// Opens the chat for the signed-in viewer.
    ///
    /// Non-admins talk to the fixed admin recipient straight away. Admins get
    /// the directory loaded (again on every open) and the selected, or first,
    /// entry activated.
    pub async fn open(&mut self) -> Result<(), ChatError> {
        let viewer = self
            .ctx
            .identity
            .live_identity()
            .ok_or(ChatError::NotAuthenticated)?;
        let role = viewer.role;
        self.viewer = Some(viewer);

        match role {
            Role::User => self.activate(ADMIN_RECIPIENT_ID.to_string()).await,
            Role::Admin => {
                if !self.directory.is_loaded() {
                    match self.directory.load(self.ctx.api.as_ref()).await {
                        Ok(_) => {
                            let users = self.directory.users().to_vec();
                            emit(&self.ctx.events, DashboardEvent::DirectoryLoaded(users)).await;
                        }
                        Err(err) => log::warn!("Failed to load chat directory: {err}"),
                    }
                }
                if let Some(user) = self.directory.selected().cloned() {
                    let counterpart_id = user.id.clone();
                    emit(&self.ctx.events, DashboardEvent::TargetSelected(user)).await;
                    self.activate(counterpart_id).await;
                }
            }
        }
        Ok(())
    }

    /// Admin only. Switching to a different user is the one way the
    /// conversation key changes.
    pub async fn select_target(&mut self, user: ChatUser) -> Result<bool, ChatError> {
        let viewer = self.viewer.as_ref().ok_or(ChatError::NotAuthenticated)?;
        if viewer.role != Role::Admin {
            return Err(ChatError::Forbidden);
        }
        if !self.directory.select(user.clone()) {
            return Ok(false);
        }

        let counterpart_id = user.id.clone();
        emit(&self.ctx.events, DashboardEvent::TargetSelected(user)).await;
        self.activate(counterpart_id).await;
        Ok(true)
    }

    pub async fn select_target_by_id(&mut self, user_id: &str) -> Result<bool, ChatError> {
        let user = self
            .directory
            .find(user_id)
            .cloned()
            .ok_or_else(|| ChatError::UnknownUser(user_id.to_string()))?;
        self.select_target(user).await
    }

    async fn activate(&mut self, counterpart_id: String) {
        let Some(viewer) = self.viewer.as_ref() else {
            return;
        };
        let key = ConversationKey {
            self_id: viewer.subject_id.clone(),
            role: viewer.role,
            counterpart_id,
        };

        let epoch = {
            let mut conversation = self.ctx.conversation.lock().await;
            let running = self.poller.as_ref().is_some_and(Poller::is_running);
            if running && conversation.key.as_ref() == Some(&key) {
                return;
            }

            // At most one armed timer per session.
            if let Some(previous) = self.poller.take() {
                previous.stop();
            }
            conversation.epoch += 1;
            conversation.key = Some(key.clone());
            conversation.messages.clear();
            conversation.epoch
        };

        log::info!("Chat conversation with {} is active", key.counterpart_id);
        emit(
            &self.ctx.events,
            DashboardEvent::ConversationChanged(Some(key.clone())),
        )
        .await;

        let ctx = self.ctx.clone();
        self.poller = Some(Poller::start("chat", self.period, move || {
            let ctx = ctx.clone();
            let key = key.clone();
            async move { ctx.fetch(key, epoch).await }
        }));
    }

    /// Posts the trimmed draft to the current counterpart.
    ///
    /// Blank drafts and sessions without a counterpart are skipped without a
    /// request. On success the draft is cleared and the conversation is
    /// re-fetched at once; on failure the draft is left as it was.
    pub async fn send(&self, draft: &mut String) -> Result<SendOutcome, ChatError> {
        let content = draft.trim().to_string();
        if content.is_empty() {
            return Ok(SendOutcome::Skipped);
        }
        let Some(key) = self.conversation_key().await else {
            return Ok(SendOutcome::Skipped);
        };
        if !self.ctx.identity.is_live() {
            return Err(ChatError::NotAuthenticated);
        }

        let (to_id, to_role) = match key.role {
            Role::User => (ADMIN_RECIPIENT_ID.to_string(), Role::Admin),
            Role::Admin => (key.counterpart_id.clone(), Role::User),
        };
        let outgoing = OutgoingMessage {
            to_id,
            to_role,
            content,
        };

        if let Err(err) = self.ctx.api.send_message(&outgoing).await {
            log::warn!("Failed to send chat message: {err}");
            return Err(err.into());
        }

        draft.clear();
        self.refresh().await;
        Ok(SendOutcome::Sent)
    }

    /// One fetch for the active conversation, outside the timer.
    pub async fn refresh(&self) {
        let current = {
            let conversation = self.ctx.conversation.lock().await;
            conversation
                .key
                .clone()
                .map(|key| (key, conversation.epoch))
        };
        if let Some((key, epoch)) = current {
            self.ctx.fetch(key, epoch).await;
        }
    }

    /// Disarms the timer and forgets the conversation. Safe to call twice.
    pub async fn close(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
        let was_active = {
            let mut conversation = self.ctx.conversation.lock().await;
            conversation.epoch += 1;
            conversation.messages.clear();
            conversation.key.take().is_some()
        };
        self.viewer = None;
        self.directory.invalidate();

        if was_active {
            log::info!("Chat conversation closed");
            emit(&self.ctx.events, DashboardEvent::ConversationChanged(None)).await;
        }
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.ctx.conversation.lock().await.messages.clone()
    }

    pub async fn conversation_key(&self) -> Option<ConversationKey> {
        self.ctx.conversation.lock().await.key.clone()
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(Poller::is_running)
    }

    /// Whether the viewer wrote this message (drawn on "my" side).
    pub fn is_mine(&self, message: &Message) -> bool {
        self.viewer
            .as_ref()
            .is_some_and(|viewer| viewer.subject_id == message.from_id)
    }

    pub fn viewer(&self) -> Option<&Identity> {
        self.viewer.as_ref()
    }

    pub fn directory(&self) -> &AdminDirectory {
        &self.directory
    }
}
