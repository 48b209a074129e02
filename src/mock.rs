//! In-memory registry used by tests and the demo tooling.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;

use crate::registry::{MessageData, MessageRegistry, MsgHandle, RegistryError};

/// A stand-in for the messaging layer's registry.
///
/// Tracks handles by message id and lets callers control the locality rule
/// directly. Interior mutability so a shared `Arc<dyn MessageRegistry>` can
/// still be driven from test code.
#[derive(Default)]
pub struct MockRegistry {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    tracked: HashMap<u8, MessageData>,
    local_ids: HashSet<u8>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a message and return its live handle.
    pub fn track(&self, msg_id: u8, service: u8) -> MsgHandle {
        let handle = MsgHandle::new();
        self.inner.lock().tracked.insert(
            msg_id,
            MessageData {
                msg_id,
                service,
                handle: handle.clone(),
            },
        );
        handle
    }

    /// Drop the tracked entry, as the registry does once a conversation is
    /// fully torn down. Existing handles stay valid.
    pub fn forget(&self, msg_id: u8) {
        self.inner.lock().tracked.remove(&msg_id);
    }

    pub fn mark_local(&self, msg_id: u8) {
        self.inner.lock().local_ids.insert(msg_id);
    }
}

impl MessageRegistry for MockRegistry {
    fn msg_id_is_local(&self, msg_id: u8) -> bool {
        self.inner.lock().local_ids.contains(&msg_id)
    }

    fn get_message_data(&self, msg_id: u8) -> Result<MessageData, RegistryError> {
        self.inner
            .lock()
            .tracked
            .get(&msg_id)
            .cloned()
            .ok_or(RegistryError::NotFound { msg_id })
    }
}
