//! Draft persistence between wizard sessions.
//!
//! The draft is written after every mutation, so an interrupted session
//! resumes where it left off. Storage is last-write-wins under a single
//! well-known file name; there is exactly one in-progress draft per
//! machine.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kwabo_core::draft::ListingDraft;
use kwabo_core::wizard::clamp_step;

/// Envelope version written by this build. Drafts stamped with any other
/// version are discarded on load.
pub const DRAFT_SCHEMA_VERSION: u32 = 1;

/// Well-known file name inside the draft directory.
pub const DRAFT_FILE_NAME: &str = "listing_draft.json";

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Draft I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Draft serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// On-disk envelope around the draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDraft {
    pub schema_version: u32,
    pub saved_at: DateTime<Utc>,
    pub step: u8,
    pub draft: ListingDraft,
}

/// Where in-progress drafts live between sessions.
///
/// `load` answers `None` for anything unusable (missing, unparseable,
/// wrong schema version): a draft that cannot be restored safely is
/// discarded rather than propagated as an error.
pub trait DraftStore {
    fn save(&self, draft: &ListingDraft, step: u8) -> Result<(), StoreError>;
    fn load(&self) -> Result<Option<(ListingDraft, u8)>, StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Interpret a loaded envelope: version gate plus step bounding.
fn restore(stored: StoredDraft) -> Option<(ListingDraft, u8)> {
    if stored.schema_version != DRAFT_SCHEMA_VERSION {
        tracing::warn!(
            found = stored.schema_version,
            expected = DRAFT_SCHEMA_VERSION,
            "Discarding draft with unknown schema version"
        );
        return None;
    }
    Some((stored.draft, clamp_step(stored.step)))
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// JSON draft file under a directory.
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    /// Store drafts under `dir`, creating it on first save.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(DRAFT_FILE_NAME),
        }
    }

    /// Path of the draft file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DraftStore for FileDraftStore {
    fn save(&self, draft: &ListingDraft, step: u8) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let stored = StoredDraft {
            schema_version: DRAFT_SCHEMA_VERSION,
            saved_at: Utc::now(),
            step,
            draft: draft.clone(),
        };
        fs::write(&self.path, serde_json::to_vec_pretty(&stored)?)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<(ListingDraft, u8)>, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice::<StoredDraft>(&raw) {
            Ok(stored) => Ok(restore(stored)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding unreadable draft");
                Ok(None)
            }
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Test double holding one envelope in memory.
#[derive(Default)]
pub struct MemoryDraftStore {
    slot: Mutex<Option<StoredDraft>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload an envelope, as if a previous session had saved it.
    pub fn preload(&self, stored: StoredDraft) {
        *self.slot.lock().unwrap() = Some(stored);
    }

    /// Number of saves observed so far is not tracked; this just tells
    /// whether anything is currently stored.
    pub fn is_empty(&self) -> bool {
        self.slot.lock().unwrap().is_none()
    }
}

impl DraftStore for MemoryDraftStore {
    fn save(&self, draft: &ListingDraft, step: u8) -> Result<(), StoreError> {
        *self.slot.lock().unwrap() = Some(StoredDraft {
            schema_version: DRAFT_SCHEMA_VERSION,
            saved_at: Utc::now(),
            step,
            draft: draft.clone(),
        });
        Ok(())
    }

    fn load(&self) -> Result<Option<(ListingDraft, u8)>, StoreError> {
        Ok(self.slot.lock().unwrap().clone().and_then(restore))
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_with_title(title: &str) -> ListingDraft {
        let mut draft = ListingDraft::default();
        draft.title = title.to_string();
        draft
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryDraftStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&draft_with_title("Villa à Cotonou"), 6).unwrap();
        let (draft, step) = store.load().unwrap().unwrap();
        assert_eq!(draft.title, "Villa à Cotonou");
        assert_eq!(step, 6);

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn memory_store_discards_other_schema_versions() {
        let store = MemoryDraftStore::new();
        store.preload(StoredDraft {
            schema_version: 2,
            saved_at: Utc::now(),
            step: 4,
            draft: ListingDraft::default(),
        });
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn restore_bounds_step() {
        let store = MemoryDraftStore::new();
        store.preload(StoredDraft {
            schema_version: DRAFT_SCHEMA_VERSION,
            saved_at: Utc::now(),
            step: 42,
            draft: ListingDraft::default(),
        });
        let (_, step) = store.load().unwrap().unwrap();
        assert_eq!(step, 9);
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path());

        assert!(store.load().unwrap().is_none());
        store.save(&draft_with_title("Bureau à Ouando"), 3).unwrap();

        // A second store over the same directory sees the same draft.
        let reopened = FileDraftStore::new(dir.path());
        let (draft, step) = reopened.load().unwrap().unwrap();
        assert_eq!(draft.title, "Bureau à Ouando");
        assert_eq!(step, 3);

        store.clear().unwrap();
        assert!(reopened.load().unwrap().is_none());
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn file_store_discards_corrupt_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path());
        std::fs::write(store.path(), b"{not json").unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn file_store_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path());
        store.save(&draft_with_title("Premier"), 1).unwrap();
        store.save(&draft_with_title("Second"), 2).unwrap();
        let (draft, step) = store.load().unwrap().unwrap();
        assert_eq!(draft.title, "Second");
        assert_eq!(step, 2);
    }
}
