use std::sync::Mutex;

use super::SlotError;

/// Durable key-value slot holding at most one credential.
pub trait CredentialSlot: Send + Sync {
    /// `None` when empty or unreadable.
    fn load(&self) -> Option<String>;

    /// Overwrites any previous value.
    fn store(&self, token: &str) -> Result<(), SlotError>;

    fn clear(&self) -> Result<(), SlotError>;
}

/// Process-local slot for tests and sessions that should not outlive the process.
#[derive(Debug, Default)]
pub struct MemoryCredentialSlot {
    token: Mutex<Option<String>>,
}

impl MemoryCredentialSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl CredentialSlot for MemoryCredentialSlot {
    fn load(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn store(&self, token: &str) -> Result<(), SlotError> {
        *self
            .token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SlotError> {
        self.token
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        Ok(())
    }
}
