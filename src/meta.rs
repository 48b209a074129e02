//! Wire-level message metadata and the service/command name tables.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata for one message crossing the twine boundary.
///
/// Owned by the messaging layer; the recorder treats it as opaque. Twine
/// message ids are allocated from a byte-sized space and get reused over the
/// lifetime of a session, hence `u8`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMeta {
    pub service: u8,
    pub command: u8,
    pub msg_id: u8,
    pub ref_msg_id: u8,
    pub payload: Option<Vec<u8>>,
}

impl MessageMeta {
    /// Payload byte length, 0 when absent.
    pub fn payload_len(&self) -> usize {
        self.payload.as_ref().map(|p| p.len()).unwrap_or(0)
    }
}

/// An ordered name -> numeric id enumeration.
///
/// Enumeration order matters: reverse lookup by value returns the first
/// matching name in entry order, so duplicate ids resolve deterministically.
#[derive(Debug, Clone)]
pub struct NameTable {
    entries: Vec<(String, u8)>,
    // value -> index of first entry with that value, built once
    by_id: HashMap<u8, usize>,
}

impl NameTable {
    pub fn new(entries: &[(&str, u8)]) -> Self {
        let entries: Vec<(String, u8)> =
            entries.iter().map(|(n, v)| (n.to_string(), *v)).collect();
        let mut by_id = HashMap::new();
        for (idx, (_, v)) in entries.iter().enumerate() {
            by_id.entry(*v).or_insert(idx);
        }
        Self { entries, by_id }
    }

    /// First name registered for `id`, in enumeration order.
    pub fn name_of(&self, id: u8) -> Option<&str> {
        self.by_id.get(&id).map(|&idx| self.entries[idx].0.as_str())
    }

    pub fn id_of(&self, name: &str) -> Option<u8> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }
}

/// Service ids the view's grouping treats as continuations of an earlier
/// message rather than new conversations.
#[derive(Debug, Clone, Copy)]
pub struct ServiceTags {
    pub reply: Option<u8>,
    pub close: Option<u8>,
}

/// The two enumerations consumed from the messaging layer.
#[derive(Debug, Clone)]
pub struct NameTables {
    pub services: NameTable,
    pub commands: NameTable,
}

/// Default twine service table. Application services sit above `close` and
/// are not named here, so they render as `"?"`.
pub const TWINE_SERVICES: &[(&str, u8)] = &[
    ("protocol", 1),
    ("refRequest", 4),
    ("reply", 5),
    ("close", 6),
];

/// Default twine protocol command table.
pub const TWINE_COMMANDS: &[(&str, u8)] = &[
    ("hi", 1),
    ("ok", 2),
    ("error", 3),
    ("ping", 4),
    ("pong", 5),
    ("graceful", 6),
];

impl NameTables {
    pub fn new(services: &[(&str, u8)], commands: &[(&str, u8)]) -> Self {
        Self {
            services: NameTable::new(services),
            commands: NameTable::new(commands),
        }
    }

    pub fn twine_default() -> Self {
        Self::new(TWINE_SERVICES, TWINE_COMMANDS)
    }

    /// Human-readable `"service > command"` label for a message.
    ///
    /// Unknown service id gives exactly `"?"` with no command suffix even
    /// when the command id is known; a known service with an unknown command
    /// gives the bare service name.
    pub fn command_string(&self, raw: &MessageMeta) -> String {
        let mut cmd_str = match self.services.name_of(raw.service) {
            Some(name) => name.to_string(),
            None => return "?".to_string(),
        };
        if let Some(name) = self.commands.name_of(raw.command) {
            cmd_str.push_str(" > ");
            cmd_str.push_str(name);
        }
        cmd_str
    }

    pub fn service_tags(&self) -> ServiceTags {
        ServiceTags {
            reply: self.services.id_of("reply"),
            close: self.services.id_of("close"),
        }
    }
}
