//! Portable JSONL capture of a recorded log.
//!
//! A tape outlives the host process: one header line carrying the schema
//! version, then one line per record. Conversation open/closed state is
//! frozen at capture time, since the live registry is gone by the time a
//! tape is read back.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::recorder::LoggedMessage;
use crate::table::{self, FlatMessage, Table};

pub const TAPE_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum TapeError {
    #[error("tape I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed tape line: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tape header must be the first line")]
    MisplacedHeader,

    #[error("tape has no header line")]
    MissingHeader,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapeEntry {
    pub seq: u64,
    pub ts_ms: u64,
    pub message: FlatMessage,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TapeJsonlLine {
    Header {
        schema_version: u32,
        created_at_ms: u64,
    },
    Entry {
        entry: TapeEntry,
    },
}

#[derive(Debug, Clone)]
pub struct MessageTape {
    pub schema_version: u32,
    pub created_at_ms: u64,
    pub entries: Vec<TapeEntry>,
}

impl MessageTape {
    /// Freeze a record list into a tape. `is_open` is read from the live
    /// handles here and never again.
    pub fn capture(messages: &[LoggedMessage]) -> Self {
        Self {
            schema_version: TAPE_SCHEMA_VERSION,
            created_at_ms: now_ms(),
            entries: messages
                .iter()
                .map(|m| TapeEntry {
                    seq: m.i,
                    ts_ms: m.ts.timestamp_millis().max(0) as u64,
                    message: table::flatten(m),
                })
                .collect(),
        }
    }

    pub fn write_jsonl_to_path(&self, path: &Path) -> Result<(), TapeError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        let header = TapeJsonlLine::Header {
            schema_version: self.schema_version,
            created_at_ms: self.created_at_ms,
        };
        writeln!(writer, "{}", serde_json::to_string(&header)?)?;
        for entry in &self.entries {
            let line = TapeJsonlLine::Entry {
                entry: entry.clone(),
            };
            writeln!(writer, "{}", serde_json::to_string(&line)?)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn read_jsonl_from_path(path: &Path) -> Result<Self, TapeError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut header: Option<(u32, u64)> = None;
        let mut entries = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<TapeJsonlLine>(&line)? {
                TapeJsonlLine::Header {
                    schema_version,
                    created_at_ms,
                } => {
                    if idx != 0 {
                        return Err(TapeError::MisplacedHeader);
                    }
                    header = Some((schema_version, created_at_ms));
                }
                TapeJsonlLine::Entry { entry } => entries.push(entry),
            }
        }

        let (schema_version, created_at_ms) = header.ok_or(TapeError::MissingHeader)?;
        Ok(Self {
            schema_version,
            created_at_ms,
            entries,
        })
    }

    /// Tabular view of the tape, same columns as a live flat print.
    pub fn table(&self) -> Table {
        let flats: Vec<FlatMessage> = self.entries.iter().map(|e| e.message.clone()).collect();
        table::table_of(&flats)
    }
}

fn now_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
