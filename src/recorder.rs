//! Append-only recorder for messages crossing the twine boundary.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::meta::{MessageMeta, NameTables};
use crate::registry::{MessageRegistry, MsgHandle};
use crate::store::{FlagStore, RECORD_FLAG_KEY};
use crate::view::MessagesOut;

/// One observed message, tagged at log time.
///
/// Everything here is fixed when the record is created, except the `closed`
/// state read through `reg_m`, which is live registry state.
#[derive(Debug, Clone)]
pub struct LoggedMessage {
    pub raw: Arc<MessageMeta>,
    pub is_local: bool,
    pub is_sent: bool,
    pub cmd_str: String,
    pub reg_m: MsgHandle,
    pub ts: DateTime<Utc>,
    pub i: u64,
}

/// Collects messages for debugging use.
///
/// The toggle survives a host reload: it is read from the flag store at
/// construction and written back on every `start_record`/`stop_record`.
pub struct MessageLogger {
    record: bool,
    messages: Vec<LoggedMessage>,
    cur_i: u64,
    registry: Arc<dyn MessageRegistry>,
    store: Arc<dyn FlagStore>,
    tables: NameTables,
}

impl MessageLogger {
    /// Recorder over the default twine name tables.
    pub fn new(registry: Arc<dyn MessageRegistry>, store: Arc<dyn FlagStore>) -> Self {
        Self::with_tables(registry, store, NameTables::twine_default())
    }

    pub fn with_tables(
        registry: Arc<dyn MessageRegistry>,
        store: Arc<dyn FlagStore>,
        tables: NameTables,
    ) -> Self {
        let record = store
            .get(RECORD_FLAG_KEY)
            .map(|v| !v.is_empty())
            .unwrap_or(false);
        Self {
            record,
            messages: Vec::new(),
            cur_i: 0,
            registry,
            store,
            tables,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.record
    }

    pub fn start_record(&mut self) {
        self.record = true;
        self.store.set(RECORD_FLAG_KEY, "record");
        tracing::debug!("message recording started");
    }

    pub fn stop_record(&mut self) {
        self.record = false;
        self.store.set(RECORD_FLAG_KEY, "");
        tracing::debug!("message recording stopped");
    }

    pub fn log_sent(&mut self, raw: MessageMeta, reg_m: MsgHandle) {
        self.log_message(raw, reg_m, true);
    }

    pub fn log_received(&mut self, raw: MessageMeta, reg_m: MsgHandle) {
        self.log_message(raw, reg_m, false);
    }

    fn log_message(&mut self, raw: MessageMeta, reg_m: MsgHandle, is_sent: bool) {
        // one boolean check is the whole cost of disabled logging
        if !self.record {
            return;
        }

        let is_local = self.registry.msg_id_is_local(raw.msg_id);
        let cmd_str = self.tables.command_string(&raw);
        self.messages.push(LoggedMessage {
            raw: Arc::new(raw),
            is_local,
            is_sent,
            cmd_str,
            reg_m,
            ts: Utc::now(),
            i: self.cur_i,
        });
        self.cur_i += 1;
    }

    pub fn messages(&self) -> &[LoggedMessage] {
        &self.messages
    }

    /// Snapshot the current log into a chainable view. Later log calls do
    /// not show up in a view built earlier.
    pub fn out(&self) -> MessagesOut {
        MessagesOut::new(
            self.messages.clone(),
            self.registry.clone(),
            self.tables.service_tags(),
        )
    }
}
