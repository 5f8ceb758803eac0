use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recipient id used by non-admin accounts; the backend routes it to the admin inbox.
pub const ADMIN_RECIPIENT_ID: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(format!("unknown role `{other}`")),
        }
    }
}

/// Identity facts decoded from the stored credential. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject_id: String,
    pub role: Role,
    pub issued_at: Option<i64>,
    /// Seconds since the Unix epoch.
    pub expires_at: i64,
    pub display_name: Option<String>,
}

impl Identity {
    /// Live iff `expires_at * 1000 > now_ms`.
    pub fn is_live_at(&self, now_ms: i64) -> bool {
        self.expires_at.saturating_mul(1000) > now_ms
    }

    pub fn is_live(&self) -> bool {
        self.is_live_at(Utc::now().timestamp_millis())
    }
}

/// Directory entry shown to admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUser {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
}

impl ChatUser {
    pub fn label(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(alias = "from_id")]
    pub from_id: String,
    #[serde(alias = "to_id")]
    pub to_id: String,
    #[serde(alias = "to_role")]
    pub to_role: Role,
    pub content: String,
    #[serde(default)]
    pub timestamp: String,
}

impl Message {
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

/// Stable chronological ordering; messages with an unreadable timestamp go first.
pub fn sort_chronologically(messages: &mut [Message]) {
    messages.sort_by_key(|message| message.sent_at());
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub seen: bool,
}

/// Selects which two-party message stream is polled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub self_id: String,
    pub role: Role,
    pub counterpart_id: String,
}

/// Accepts RFC 3339 as well as the backend's naive `isoformat()` output (taken as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
