//! Display-oriented flattening and plain-text table formatting.

use serde::{Deserialize, Serialize};

use crate::recorder::LoggedMessage;

/// The display shape of a logged message.
///
/// Payload is surfaced as a byte count only, and the wall-clock timestamp is
/// deliberately left out. `is_open` is the live conversation state at
/// flatten time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatMessage {
    pub service: u8,
    pub command: u8,
    pub cmd_str: String,
    #[serde(rename = "msgID")]
    pub msg_id: u8,
    #[serde(rename = "refMsgID")]
    pub ref_msg_id: u8,
    pub payload: usize,
    pub is_local: bool,
    pub is_sent: bool,
    pub is_open: bool,
    pub i: u64,
}

pub fn flatten(m: &LoggedMessage) -> FlatMessage {
    FlatMessage {
        service: m.raw.service,
        command: m.raw.command,
        cmd_str: m.cmd_str.clone(),
        msg_id: m.raw.msg_id,
        ref_msg_id: m.raw.ref_msg_id,
        payload: m.raw.payload_len(),
        is_local: m.is_local,
        is_sent: m.is_sent,
        is_open: !m.reg_m.is_closed(),
        i: m.i,
    }
}

/// A rendered-sink-agnostic table: a header row plus string rows. Whoever
/// holds it decides where it goes (stdout, a log file, a UI widget).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

const FLAT_COLUMNS: &[&str] = &[
    "i", "cmd_str", "service", "command", "msgID", "refMsgID", "payload", "local", "sent", "open",
];

fn flat_row(f: &FlatMessage) -> Vec<String> {
    vec![
        f.i.to_string(),
        f.cmd_str.clone(),
        f.service.to_string(),
        f.command.to_string(),
        f.msg_id.to_string(),
        f.ref_msg_id.to_string(),
        f.payload.to_string(),
        f.is_local.to_string(),
        f.is_sent.to_string(),
        f.is_open.to_string(),
    ]
}

/// Table over a flat record list.
pub fn flat_table(messages: &[LoggedMessage]) -> Table {
    let flats: Vec<FlatMessage> = messages.iter().map(flatten).collect();
    table_of(&flats)
}

/// Table over records that are already flattened (e.g. read back from a
/// tape).
pub fn table_of(flats: &[FlatMessage]) -> Table {
    Table {
        header: FLAT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows: flats.iter().map(flat_row).collect(),
    }
}

/// Table over grouped stacks: same columns prefixed by the stack index, one
/// row per record.
pub fn grouped_table(groups: &[Vec<LoggedMessage>]) -> Table {
    let mut header = vec!["stack".to_string()];
    header.extend(FLAT_COLUMNS.iter().map(|c| c.to_string()));

    let mut rows = Vec::new();
    for (idx, group) in groups.iter().enumerate() {
        for m in group {
            let mut row = vec![idx.to_string()];
            row.extend(flat_row(&flatten(m)));
            rows.push(row);
        }
    }
    Table { header, rows }
}

impl Table {
    /// Column-aligned plain-text rendering, one line per row.
    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.header.iter().map(|h| h.len()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if cell.len() > widths[i] {
                    widths[i] = cell.len();
                }
            }
        }

        let mut out = String::new();
        render_line(&mut out, &self.header, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        render_line(&mut out, &rule, &widths);
        for row in &self.rows {
            render_line(&mut out, row, &widths);
        }
        out
    }
}

fn render_line(out: &mut String, cells: &[String], widths: &[usize]) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(cell);
        for _ in cell.len()..widths[i] {
            out.push(' ');
        }
    }
    // trim trailing pad from the last column
    while out.ends_with(' ') {
        out.pop();
    }
    out.push('\n');
}
