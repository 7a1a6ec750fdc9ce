//! Draft persistence port
//!
//! The editor autosaves in-progress proposal content through an injected
//! [`DraftStore`] so the validation core stays pure and testable. The
//! filesystem implementation writes one JSON file per draft with a
//! temp-file + rename swap under an exclusive lock.

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

use crate::content::ProposalContent;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Draft storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize draft: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Identity of one draft: all three fields together identify an instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftKey {
    pub service_name: String,
    pub lot: String,
    pub gcloud_version: String,
}

impl DraftKey {
    pub fn new(
        service_name: impl Into<String>,
        lot: impl Into<String>,
        gcloud_version: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            lot: lot.into(),
            gcloud_version: gcloud_version.into(),
        }
    }

    /// Filesystem-safe file stem for this key. Each component is escaped
    /// injectively so distinct keys never share a file: ASCII alphanumerics
    /// pass through, every other byte becomes `_` plus two hex digits.
    /// `-` joins the components and cannot appear inside an escaped one.
    fn file_stem(&self) -> String {
        format!(
            "{}-lot{}-v{}",
            escape_component(&self.service_name),
            escape_component(&self.lot),
            escape_component(&self.gcloud_version)
        )
    }
}

fn escape_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() {
            out.push(byte as char);
        } else {
            out.push_str(&format!("_{byte:02x}"));
        }
    }
    out
}

/// A saved draft with its timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRecord {
    pub content: ProposalContent,
    pub saved_at: DateTime<Utc>,
}

impl DraftRecord {
    pub fn new(content: ProposalContent) -> Self {
        Self {
            content,
            saved_at: Utc::now(),
        }
    }
}

/// Save-on-change / load-on-mount persistence boundary
pub trait DraftStore {
    fn load(&self, key: &DraftKey) -> StoreResult<Option<DraftRecord>>;
    fn save(&self, key: &DraftKey, record: &DraftRecord) -> StoreResult<()>;
    fn delete(&self, key: &DraftKey) -> StoreResult<()>;
}

/// Filesystem-backed store: one pretty-printed JSON file per draft
pub struct FileDraftStore {
    base_dir: PathBuf,
}

impl FileDraftStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn draft_path(&self, key: &DraftKey) -> PathBuf {
        self.base_dir.join(format!("{}.json", key.file_stem()))
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self, key: &DraftKey) -> StoreResult<Option<DraftRecord>> {
        let path = self.draft_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)?;
        let record = serde_json::from_str(&json)?;
        log::debug!("Loaded draft: {:?}", path);
        Ok(Some(record))
    }

    fn save(&self, key: &DraftKey, record: &DraftRecord) -> StoreResult<()> {
        fs::create_dir_all(&self.base_dir)?;

        let path = self.draft_path(key);
        let json = serde_json::to_string_pretty(record)?;
        atomic_write(&path, &json)?;

        log::debug!("Saved draft: {:?}", path);
        Ok(())
    }

    fn delete(&self, key: &DraftKey) -> StoreResult<()> {
        let path = self.draft_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
            log::debug!("Deleted draft: {:?}", path);
        }
        Ok(())
    }
}

/// Write content to a temp file, then rename over the target so readers
/// never observe a partial draft. The temp file holds an exclusive lock
/// while being written.
fn atomic_write(path: &Path, content: &str) -> StoreResult<()> {
    let tmp_path = path.with_extension("json.tmp");

    let mut tmp = fs::File::create(&tmp_path)?;
    tmp.lock_exclusive()?;
    tmp.write_all(content.as_bytes())?;
    tmp.sync_all()?;
    fs2::FileExt::unlock(&tmp)?;
    drop(tmp);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryDraftStore {
    entries: Mutex<HashMap<DraftKey, DraftRecord>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStore for MemoryDraftStore {
    fn load(&self, key: &DraftKey) -> StoreResult<Option<DraftRecord>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &DraftKey, record: &DraftRecord) -> StoreResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.clone(), record.clone());
        Ok(())
    }

    fn delete(&self, key: &DraftKey) -> StoreResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}
