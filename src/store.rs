//! Session-scoped key/value persistence for the record toggle.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use parking_lot::Mutex;

/// Fixed key under which the recorder persists its toggle. A non-empty value
/// means recording is on.
pub const RECORD_FLAG_KEY: &str = "twine_logger_record";

/// Minimal key/value store for the recorder's persisted state.
///
/// Writes are best-effort: the recorder's in-memory flag must flip even when
/// persistence fails, so implementations log and swallow I/O errors.
pub trait FlagStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// One file per key under a data directory.
pub struct FileFlagStore {
    dir: PathBuf,
}

impl FileFlagStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the default data directory (`~/.twine-logger`).
    pub fn default_dir() -> Self {
        let dir = dirs::home_dir()
            .map(|h| h.join(".twine-logger"))
            .unwrap_or_else(|| PathBuf::from(".twine-logger"));
        Self::new(dir)
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl FlagStore for FileFlagStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(err) = fs::create_dir_all(&self.dir) {
            tracing::warn!(error = %err, dir = %self.dir.display(), "failed to create flag store dir");
            return;
        }
        if let Err(err) = fs::write(self.key_path(key), value) {
            tracing::warn!(error = %err, key, "failed to persist flag");
        }
    }
}

/// In-memory store for tests and hosts without a writable disk.
#[derive(Default)]
pub struct MemoryFlagStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlagStore for MemoryFlagStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.lock().insert(key.to_string(), value.to_string());
    }
}
