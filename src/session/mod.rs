//! Credential storage and the identity facts derived from it.
//!
//! [`IdentityStore`] is the one narrow interface to the credential slot.
//! Every check re-reads and re-decodes the slot; nothing is cached, so a
//! sign-out or expiry is observed by the very next call.

pub mod identity;
pub mod slot;

use std::sync::Arc;

use thiserror::Error;

use crate::common::{Identity, Role};

pub use identity::decode_identity;
pub use slot::{CredentialSlot, MemoryCredentialSlot};

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("credential storage failed: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Shared handle to the active credential. Cheap to clone.
#[derive(Clone)]
pub struct IdentityStore {
    slot: Arc<dyn CredentialSlot>,
}

impl IdentityStore {
    pub fn new(slot: Arc<dyn CredentialSlot>) -> Self {
        Self { slot }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCredentialSlot::new()))
    }

    /// Stores the token as-is; shape is not validated.
    pub fn save_credential(&self, token: &str) -> Result<(), SlotError> {
        self.slot.store(token)
    }

    pub fn credential(&self) -> Option<String> {
        self.slot.load()
    }

    pub fn clear_credential(&self) -> Result<(), SlotError> {
        self.slot.clear()
    }

    pub fn derive_identity(&self) -> Option<Identity> {
        self.credential().as_deref().and_then(decode_identity)
    }

    pub fn is_live(&self) -> bool {
        self.derive_identity().is_some_and(|identity| identity.is_live())
    }

    /// The live identity, if any.
    pub fn live_identity(&self) -> Option<Identity> {
        self.derive_identity().filter(Identity::is_live)
    }

    pub fn role(&self) -> Option<Role> {
        self.derive_identity().map(|identity| identity.role)
    }

    pub fn is_admin(&self) -> bool {
        self.live_identity()
            .is_some_and(|identity| identity.role == Role::Admin)
    }

    pub fn is_user(&self) -> bool {
        self.live_identity()
            .is_some_and(|identity| identity.role == Role::User)
    }
}

impl std::fmt::Debug for IdentityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityStore")
            .field("has_credential", &self.credential().is_some())
            .finish()
    }
}
