//! Seam to the live message registry owned by the messaging layer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Errors surfaced by registry lookups.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No tracked entry exists for the message id.
    #[error("message {msg_id} is not tracked by the registry")]
    NotFound { msg_id: u8 },
}

/// Shared handle to the registry's per-message tracking entry.
///
/// The `closed` flag is live, not a snapshot: the registry flips it when the
/// conversation closes, and a logged record reading it later sees the current
/// value. Writes are last-write-wins.
#[derive(Debug, Clone, Default)]
pub struct MsgHandle {
    closed: Arc<AtomicBool>,
}

impl MsgHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn set_closed(&self, closed: bool) {
        self.closed.store(closed, Ordering::SeqCst);
    }
}

/// The registry's view of one tracked message.
#[derive(Debug, Clone)]
pub struct MessageData {
    pub msg_id: u8,
    pub service: u8,
    pub handle: MsgHandle,
}

/// Read-only interface to the live registry.
pub trait MessageRegistry: Send + Sync {
    /// Whether the message id was allocated locally (outbound side of the
    /// conversation) under the registry's locality rule.
    fn msg_id_is_local(&self, msg_id: u8) -> bool;

    /// The tracked entry for a message id, if the registry still has one.
    fn get_message_data(&self, msg_id: u8) -> Result<MessageData, RegistryError>;
}
