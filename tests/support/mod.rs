#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use beehive_dashboard::common::{ChatUser, Message, Notification, Role};
use beehive_dashboard::network::{ApiError, DashboardApi, NotificationPage, OutgoingMessage};
use beehive_dashboard::session::{IdentityStore, MemoryCredentialSlot};
use chrono::Utc;
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchMessages(String),
    SendMessage(OutgoingMessage),
    FetchDirectory,
    FetchNotifications { page: u32, limit: u32 },
    MarkSeen(Vec<String>),
}

#[derive(Default)]
struct Backend {
    calls: Vec<Call>,
    conversations: HashMap<String, Vec<Message>>,
    message_delays: HashMap<String, Duration>,
    fail_messages: bool,
    fail_send: bool,
    directory: Vec<ChatUser>,
    notifications: Vec<Notification>,
    unseen_override: Option<u64>,
    ignore_mark_seen: bool,
    fail_mark_seen: bool,
}

/// In-process backend that records every call and serves scripted data.
#[derive(Default)]
pub struct FakeApi {
    backend: Mutex<Backend>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn backend(&self) -> MutexGuard<'_, Backend> {
        self.backend.lock().unwrap()
    }

    pub fn set_conversation(&self, counterpart_id: &str, messages: Vec<Message>) {
        self.backend()
            .conversations
            .insert(counterpart_id.to_string(), messages);
    }

    pub fn delay_messages(&self, counterpart_id: &str, delay: Duration) {
        self.backend()
            .message_delays
            .insert(counterpart_id.to_string(), delay);
    }

    pub fn fail_messages(&self, fail: bool) {
        self.backend().fail_messages = fail;
    }

    pub fn fail_send(&self, fail: bool) {
        self.backend().fail_send = fail;
    }

    pub fn set_directory(&self, users: Vec<ChatUser>) {
        self.backend().directory = users;
    }

    pub fn set_notifications(&self, items: Vec<Notification>) {
        self.backend().notifications = items;
    }

    pub fn override_unseen_count(&self, count: u64) {
        self.backend().unseen_override = Some(count);
    }

    /// Accept mark-seen requests without changing the stored flags.
    pub fn ignore_mark_seen(&self) {
        self.backend().ignore_mark_seen = true;
    }

    pub fn fail_mark_seen(&self, fail: bool) {
        self.backend().fail_mark_seen = fail;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.backend().calls.clone()
    }

    pub fn message_fetches(&self, counterpart_id: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::FetchMessages(id) if id == counterpart_id))
            .count()
    }

    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::SendMessage(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn notification_fetches(&self) -> Vec<(u32, u32)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::FetchNotifications { page, limit } => Some((page, limit)),
                _ => None,
            })
            .collect()
    }

    pub fn mark_seen_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::MarkSeen(ids) => Some(ids),
                _ => None,
            })
            .collect()
    }

    pub fn directory_fetches(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::FetchDirectory))
            .count()
    }
}

fn unavailable() -> ApiError {
    ApiError::Status {
        status: 503,
        message: "HTTP 503: Service Unavailable".into(),
        body: None,
    }
}

#[async_trait]
impl DashboardApi for FakeApi {
    async fn fetch_messages(&self, counterpart_id: &str) -> Result<Vec<Message>, ApiError> {
        let (delay, result) = {
            let mut backend = self.backend();
            backend
                .calls
                .push(Call::FetchMessages(counterpart_id.to_string()));
            let result = if backend.fail_messages {
                Err(unavailable())
            } else {
                Ok(backend
                    .conversations
                    .get(counterpart_id)
                    .cloned()
                    .unwrap_or_default())
            };
            (backend.message_delays.get(counterpart_id).copied(), result)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn send_message(&self, message: &OutgoingMessage) -> Result<(), ApiError> {
        let mut backend = self.backend();
        backend.calls.push(Call::SendMessage(message.clone()));
        if backend.fail_send {
            return Err(unavailable());
        }
        Ok(())
    }

    async fn fetch_directory(&self) -> Result<Vec<ChatUser>, ApiError> {
        let mut backend = self.backend();
        backend.calls.push(Call::FetchDirectory);
        Ok(backend.directory.clone())
    }

    async fn fetch_notifications(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<NotificationPage, ApiError> {
        let mut backend = self.backend();
        backend.calls.push(Call::FetchNotifications { page, limit });

        let start = (page.saturating_sub(1) * limit) as usize;
        let notifications = backend
            .notifications
            .iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect();
        let unseen_count = backend.unseen_override.unwrap_or_else(|| {
            backend
                .notifications
                .iter()
                .filter(|item| !item.seen)
                .count() as u64
        });
        Ok(NotificationPage {
            notifications,
            unseen_count,
        })
    }

    async fn mark_seen(&self, ids: &[String]) -> Result<(), ApiError> {
        let mut backend = self.backend();
        backend.calls.push(Call::MarkSeen(ids.to_vec()));
        if backend.fail_mark_seen {
            return Err(unavailable());
        }
        if !backend.ignore_mark_seen {
            for item in backend
                .notifications
                .iter_mut()
                .filter(|item| ids.contains(&item.id))
            {
                item.seen = true;
            }
        }
        Ok(())
    }
}

pub fn jwt(claims: serde_json::Value) -> String {
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

/// Token valid for another hour.
pub fn live_token(subject_id: &str, role: Role) -> String {
    jwt(json!({
        "sub": subject_id,
        "role": role.as_str(),
        "iat": Utc::now().timestamp(),
        "exp": Utc::now().timestamp() + 3600,
    }))
}

pub fn signed_in(subject_id: &str, role: Role) -> IdentityStore {
    IdentityStore::new(Arc::new(MemoryCredentialSlot::with_token(live_token(
        subject_id, role,
    ))))
}

pub fn user(id: &str, name: &str) -> ChatUser {
    ChatUser {
        id: id.into(),
        name: name.into(),
        username: id.into(),
    }
}

pub fn message(id: &str, from_id: &str, to_id: &str, to_role: Role, timestamp: &str) -> Message {
    Message {
        id: id.into(),
        from_id: from_id.into(),
        to_id: to_id.into(),
        to_role,
        content: format!("message {id}"),
        timestamp: timestamp.into(),
    }
}

pub fn notification(id: &str, seen: bool) -> Notification {
    Notification {
        id: id.into(),
        title: format!("New signup {id}"),
        username: Some("bee".into()),
        timestamp: Some("2024-05-01T10:00:00".into()),
        seen,
    }
}

/// Lets spawned poller ticks run to completion on the paused test runtime.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
