//! Session-scoped photo bytes.
//!
//! Photos picked during the current session are held in memory and
//! referenced from the draft as `session:<uuid>` sources. The cache dies
//! with the process: after a draft restore the references still parse but
//! dereference to nothing, and the submitter drops those slots.

use std::collections::HashMap;

use uuid::Uuid;

use kwabo_core::media::SESSION_SCHEME;

/// One cached photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPhoto {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// In-memory photo bytes for the current wizard session.
#[derive(Debug, Default)]
pub struct SessionMediaCache {
    entries: HashMap<String, CachedPhoto>,
}

impl SessionMediaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store bytes and return the session reference to put in the draft.
    pub fn insert(&mut self, bytes: Vec<u8>, mime: impl Into<String>) -> String {
        let reference = format!("{SESSION_SCHEME}{}", Uuid::new_v4());
        self.entries.insert(
            reference.clone(),
            CachedPhoto {
                bytes,
                mime: mime.into(),
            },
        );
        reference
    }

    /// Dereference a session reference. `None` for references minted by a
    /// previous session.
    pub fn get(&self, reference: &str) -> Option<&CachedPhoto> {
        self.entries.get(reference)
    }

    /// Drop a single entry (photo removed from the draft).
    pub fn remove(&mut self, reference: &str) -> Option<CachedPhoto> {
        self.entries.remove(reference)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_returns_resolvable_session_ref() {
        let mut cache = SessionMediaCache::new();
        let reference = cache.insert(vec![1, 2, 3], "image/jpeg");
        assert!(reference.starts_with(SESSION_SCHEME));

        let photo = cache.get(&reference).unwrap();
        assert_eq!(photo.bytes, vec![1, 2, 3]);
        assert_eq!(photo.mime, "image/jpeg");
    }

    #[test]
    fn foreign_refs_do_not_resolve() {
        let cache = SessionMediaCache::new();
        assert!(cache.get("session:0b0c9d60-0000-0000-0000-000000000000").is_none());
    }

    #[test]
    fn remove_drops_the_entry() {
        let mut cache = SessionMediaCache::new();
        let reference = cache.insert(vec![9], "image/png");
        assert!(cache.remove(&reference).is_some());
        assert!(cache.get(&reference).is_none());
        assert!(cache.is_empty());
    }
}
