use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use watch_logging::{watch_debug, watch_warn};
use watcher_core::{Normalizer, SeenSet};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store directory missing or not writable: {0}")]
    StoreDir(String),
    #[error("serialize failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// On-disk document: parallel lists, `contents[i]` is the display text
/// recorded for `keys[i]`.
#[derive(Debug, Serialize)]
struct StoreDocument {
    keys: Vec<String>,
    contents: Vec<String>,
}

/// Accepted input shapes. Early versions persisted a bare array of keys;
/// a document without `contents` reads as an empty second list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredDocument {
    Current {
        keys: Vec<String>,
        #[serde(default)]
        contents: Vec<String>,
    },
    Legacy(Vec<String>),
}

/// What `load` recovers from disk.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoredState {
    pub seen: SeenSet,
    /// Display text by normalized key, where the snapshot carried one.
    pub contents: BTreeMap<String, String>,
}

/// Durable seen-set snapshot, one JSON file, overwritten whole each run.
#[derive(Debug, Clone)]
pub struct SeenStore {
    path: PathBuf,
}

impl SeenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot. A missing, unreadable or corrupt file yields an
    /// empty state so a cold start never fails the run. Every key read is
    /// re-normalized, so snapshots written before a rule change still
    /// compare correctly.
    pub fn load(&self, normalizer: &Normalizer) -> StoredState {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                watch_debug!("no seen-set snapshot at {:?}, starting empty", self.path);
                return StoredState::default();
            }
            Err(err) => {
                watch_warn!("failed to read seen-set snapshot {:?}: {}", self.path, err);
                return StoredState::default();
            }
        };

        let document: StoredDocument = match serde_json::from_str(&text) {
            Ok(document) => document,
            Err(err) => {
                watch_warn!("failed to parse seen-set snapshot {:?}: {}", self.path, err);
                return StoredState::default();
            }
        };

        let (keys, contents) = match document {
            StoredDocument::Current { keys, contents } => (keys, contents),
            StoredDocument::Legacy(keys) => (keys, Vec::new()),
        };

        let mut state = StoredState::default();
        let mut contents = contents.into_iter();
        for key in keys {
            let normalized = normalizer.normalize(&key);
            let content = contents.next();
            if normalized.is_empty() {
                continue;
            }
            if let Some(content) = content.filter(|c| !c.is_empty()) {
                state.contents.insert(normalized.clone(), content);
            }
            state.seen.insert(normalized);
        }
        state
    }

    /// Atomically overwrites the snapshot with the full key set in sorted
    /// order. Write-new-then-rename, never in-place truncation.
    pub fn save(
        &self,
        seen: &SeenSet,
        contents: &BTreeMap<String, String>,
    ) -> Result<(), StoreError> {
        let keys: Vec<String> = seen.iter().map(ToOwned::to_owned).collect();
        let document = StoreDocument {
            contents: keys
                .iter()
                .map(|key| contents.get(key).cloned().unwrap_or_default())
                .collect(),
            keys,
        };
        let text = serde_json::to_string_pretty(&document)?;
        self.write_atomic(&text)
    }

    fn write_atomic(&self, content: &str) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        ensure_store_dir(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replace existing snapshot if present to keep determinism.
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

/// Ensure the snapshot's directory exists; create if missing.
fn ensure_store_dir(dir: &Path) -> Result<(), StoreError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| StoreError::StoreDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(StoreError::StoreDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| StoreError::StoreDir(e.to_string()))?;
    }
    Ok(())
}
