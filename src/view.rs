//! Chainable query/formatting view over a snapshot of the recorder's log.

use std::sync::Arc;

use crate::meta::ServiceTags;
use crate::recorder::LoggedMessage;
use crate::registry::MessageRegistry;
use crate::table::{self, Table};
use crate::tape::MessageTape;

/// Disposable view built by [`MessageLogger::out`](crate::MessageLogger::out).
///
/// Filters reassign the view's own working list and never touch the
/// recorder's log. Each consumes and returns the view so calls chain:
/// `logger.out().open().group_msg_id().print()`.
pub struct MessagesOut {
    messages: Vec<LoggedMessage>,
    registry: Arc<dyn MessageRegistry>,
    tags: ServiceTags,
    grouped_messages: Option<Vec<Vec<LoggedMessage>>>,
}

impl MessagesOut {
    pub(crate) fn new(
        messages: Vec<LoggedMessage>,
        registry: Arc<dyn MessageRegistry>,
        tags: ServiceTags,
    ) -> Self {
        Self {
            messages,
            registry,
            tags,
            grouped_messages: None,
        }
    }

    pub fn messages(&self) -> &[LoggedMessage] {
        &self.messages
    }

    pub fn grouped(&self) -> Option<&[Vec<LoggedMessage>]> {
        self.grouped_messages.as_deref()
    }

    /// Keep records whose conversation is still open, by the live `closed`
    /// state at call time.
    pub fn open(mut self) -> Self {
        self.messages.retain(|m| !m.reg_m.is_closed());
        self
    }

    /// Keep records whose conversation is closed and whose registry entry is
    /// still resolvable. Open conversations never pass this filter,
    /// resolvable or not.
    pub fn closed_in_registry(mut self) -> Self {
        let registry = &self.registry;
        self.messages
            .retain(|m| m.reg_m.is_closed() && registry.get_message_data(m.raw.msg_id).is_ok());
        self
    }

    /// Keep outbound records only.
    pub fn sent(mut self) -> Self {
        self.messages.retain(|m| m.is_sent);
        self
    }

    /// Keep inbound records only.
    pub fn received(mut self) -> Self {
        self.messages.retain(|m| !m.is_sent);
        self
    }

    /// Stack reply/close records under the message they continue.
    ///
    /// Message ids get reused over a session, so the search walks existing
    /// stacks newest-first and attaches to the most recently opened
    /// conversation whose first record carries the same id. Anything that is
    /// not a reply or close always opens a new stack. Sets the grouped
    /// sequence as a side effect; the flat working list is unchanged.
    pub fn group_msg_id(mut self) -> Self {
        let mut stacks: Vec<Vec<LoggedMessage>> = Vec::new();
        for m in &self.messages {
            let continues = Some(m.raw.service) == self.tags.reply
                || Some(m.raw.service) == self.tags.close;
            if !continues {
                stacks.push(vec![m.clone()]);
                continue;
            }
            match stacks
                .iter_mut()
                .rev()
                .find(|g| g.first().map(|f| f.raw.msg_id) == Some(m.raw.msg_id))
            {
                Some(stack) => stack.push(m.clone()),
                None => stacks.push(vec![m.clone()]),
            }
        }
        self.grouped_messages = Some(stacks);
        self
    }

    /// Structured table for any render sink: grouped if grouping ran,
    /// otherwise the flat working list.
    pub fn table(&self) -> Table {
        match &self.grouped_messages {
            Some(groups) => table::grouped_table(groups),
            None => table::flat_table(&self.messages),
        }
    }

    /// Capture the working list as a portable tape.
    pub fn tape(&self) -> MessageTape {
        MessageTape::capture(&self.messages)
    }

    /// Render the table to stdout.
    pub fn print(&self) {
        print!("{}", self.table().render());
    }
}
