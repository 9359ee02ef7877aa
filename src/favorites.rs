//! Favorites list with sequential shelf numbering.
//!
//! The whole list is persisted as one JSON array under [`FAVORITES_STORAGE_KEY`].
//! Shelf numbers are always `1..=len` in list order: a new entry takes `len + 1`
//! and every removal renumbers the remainder.

use crate::{
    domain::models::{BookSummary, FavoriteEntry},
    storage::BlobStore,
};

pub const FAVORITES_STORAGE_KEY: &str = "bookFinderFavorites";

#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added { shelf: u32 },
    AlreadyPresent,
}

#[derive(Debug, Default)]
pub struct FavoritesStore {
    entries: Vec<FavoriteEntry>,
    dirty: bool,
}

impl FavoritesStore {
    pub fn from_entries(entries: Vec<FavoriteEntry>) -> Self {
        let mut store = Self {
            entries: Vec::new(),
            dirty: false,
        };
        for entry in entries {
            if !store.contains(&entry.book.key) {
                store.entries.push(entry);
            }
        }
        store.renumber();
        store
    }

    /// Parse a persisted blob. Only invalid JSON or a non-array value is an
    /// error; elements that do not decode as entries are skipped, and the
    /// store is marked dirty so the cleaned list gets written back.
    pub fn from_blob(blob: &str) -> anyhow::Result<Self> {
        let values: Vec<serde_json::Value> = serde_json::from_str(blob)?;
        let total = values.len();
        let entries: Vec<FavoriteEntry> = values
            .into_iter()
            .enumerate()
            .filter_map(|(idx, value)| {
                match serde_json::from_value::<FavoriteEntry>(value) {
                    Ok(entry) if !entry.book.key.trim().is_empty() => Some(entry),
                    Ok(_) => {
                        tracing::warn!(idx, "skipping favorite without a key");
                        None
                    }
                    Err(e) => {
                        tracing::warn!(idx, error = %e, "skipping unreadable favorite");
                        None
                    }
                }
            })
            .collect();
        let mut store = Self::from_entries(entries);
        store.dirty = store.len() < total;
        Ok(store)
    }

    pub fn to_blob(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// Load from the blob store. A missing blob yields an empty list; an
    /// unreadable one is discarded and also yields an empty list.
    #[tracing::instrument(level = "debug", skip(store))]
    pub async fn load(store: &dyn BlobStore) -> Self {
        let blob = match store.get(FAVORITES_STORAGE_KEY).await {
            Ok(Some(blob)) => blob,
            Ok(None) => return Self::default(),
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), "failed to read favorites");
                return Self::default();
            }
        };
        match Self::from_blob(&blob) {
            Ok(mut loaded) => {
                if loaded.is_empty() {
                    tracing::debug!("no favorites saved yet");
                } else {
                    tracing::info!(count = loaded.len(), "loaded favorites");
                }
                loaded.persist_if_dirty(store).await;
                loaded
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding corrupted favorites blob");
                if let Err(e) = store.remove(FAVORITES_STORAGE_KEY).await {
                    tracing::error!(
                        error = %format!("{:?}", e),
                        "failed to remove corrupted favorites blob"
                    );
                }
                Self::default()
            }
        }
    }

    /// Rewrite the persisted blob if anything changed since the last write.
    /// A failed write is logged and the in-memory list stays authoritative.
    #[tracing::instrument(
        level = "debug",
        skip(self, store),
        fields(count = self.entries.len())
    )]
    pub async fn persist_if_dirty(&mut self, store: &dyn BlobStore) {
        if !self.dirty {
            return;
        }
        let blob = match self.to_blob() {
            Ok(blob) => blob,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode favorites");
                return;
            }
        };
        match store.put(FAVORITES_STORAGE_KEY, &blob).await {
            Ok(()) => self.dirty = false,
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), "failed to save favorites")
            }
        }
    }

    pub fn add(&mut self, book: BookSummary) -> AddOutcome {
        if self.contains(&book.key) {
            return AddOutcome::AlreadyPresent;
        }
        let shelf = self.entries.len() as u32 + 1;
        self.entries.push(FavoriteEntry { book, shelf });
        self.dirty = true;
        AddOutcome::Added { shelf }
    }

    /// Remove by key and renumber; `None` (and no change) when absent.
    pub fn remove(&mut self, key: &str) -> Option<FavoriteEntry> {
        let idx = self.entries.iter().position(|e| e.book.key == key)?;
        let removed = self.entries.remove(idx);
        self.renumber();
        self.dirty = true;
        Some(removed)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.book.key == key)
    }

    pub fn get(&self, key: &str) -> Option<&FavoriteEntry> {
        self.entries.iter().find(|e| e.book.key == key)
    }

    pub fn list(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn renumber(&mut self) {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.shelf = i as u32 + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryBlobStore;

    fn dune() -> BookSummary {
        BookSummary::new("/works/1", "Dune")
    }

    fn shelves(store: &FavoritesStore) -> Vec<(String, u32)> {
        store
            .list()
            .iter()
            .map(|e| (e.book.key.clone(), e.shelf))
            .collect()
    }

    #[test]
    fn adding_twice_keeps_one_entry() {
        let mut store = FavoritesStore::default();
        assert_eq!(store.add(dune()), AddOutcome::Added { shelf: 1 });
        assert_eq!(store.add(dune()), AddOutcome::AlreadyPresent);
        assert_eq!(store.len(), 1);
        assert!(store.contains("/works/1"));
    }

    #[test]
    fn removing_absent_key_is_noop() {
        let mut store = FavoritesStore::default();
        store.add(dune());
        store.dirty = false;
        assert_eq!(store.remove("/works/404"), None);
        assert_eq!(store.len(), 1);
        assert!(!store.dirty);
    }

    #[test]
    fn removal_renumbers_contiguously() {
        let mut store = FavoritesStore::default();
        for k in ["A", "B", "C"] {
            store.add(BookSummary::new(k, k));
        }
        assert_eq!(
            shelves(&store),
            vec![("A".into(), 1), ("B".into(), 2), ("C".into(), 3)]
        );
        let removed = store.remove("B").unwrap();
        assert_eq!(removed.shelf, 2);
        assert_eq!(shelves(&store), vec![("A".into(), 1), ("C".into(), 2)]);
        assert_eq!(
            store.add(BookSummary::new("D", "D")),
            AddOutcome::Added { shelf: 3 }
        );
    }

    #[test]
    fn blob_without_shelves_is_numbered_and_deduplicated() {
        let blob = r#"[
            {"key":"/works/1","title":"Dune","author_name":["Frank Herbert"],"cover_i":1},
            {"key":"/works/2","title":"Emma"},
            {"key":"/works/1","title":"Dune again"}
        ]"#;
        let store = FavoritesStore::from_blob(blob).unwrap();
        assert_eq!(
            shelves(&store),
            vec![("/works/1".into(), 1), ("/works/2".into(), 2)]
        );
        assert_eq!(store.get("/works/1").unwrap().book.title, "Dune");
    }

    #[test]
    fn non_list_blob_is_rejected() {
        assert!(FavoritesStore::from_blob(r#"{"key":"/works/1"}"#).is_err());
        assert!(FavoritesStore::from_blob("not json").is_err());
    }

    #[tokio::test]
    async fn malformed_blob_loads_empty_and_is_discarded() {
        let blob_store = MemoryBlobStore::with_entry(FAVORITES_STORAGE_KEY, "{oops");
        let store = FavoritesStore::load(&blob_store).await;
        assert!(store.is_empty());
        assert_eq!(blob_store.raw(FAVORITES_STORAGE_KEY), None);
    }

    #[tokio::test]
    async fn unreadable_elements_are_skipped_and_rewritten() {
        let blob_store = MemoryBlobStore::with_entry(
            FAVORITES_STORAGE_KEY,
            r#"[
                {"key":"/works/1","title":"Dune"},
                {"title":"no key"},
                {"key":"/works/2","title":null},
                {"key":"  ","title":"blank key"},
                {"key":"/works/3","title":"Emma","shelf":7}
            ]"#,
        );
        let store = FavoritesStore::load(&blob_store).await;
        assert_eq!(
            shelves(&store),
            vec![("/works/1".into(), 1), ("/works/3".into(), 2)]
        );
        assert!(!store.dirty);

        let rewritten =
            FavoritesStore::from_blob(&blob_store.raw(FAVORITES_STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(shelves(&rewritten), shelves(&store));
        assert!(!rewritten.dirty);
    }

    #[tokio::test]
    async fn persisted_keys_survive_reload() {
        let blob_store = MemoryBlobStore::default();
        let mut store = FavoritesStore::load(&blob_store).await;
        for k in ["/works/1", "/works/2", "/works/3"] {
            store.add(BookSummary::new(k, "t"));
            store.persist_if_dirty(&blob_store).await;
        }
        store.remove("/works/2");
        store.add(BookSummary::new("/works/1", "dup"));
        store.persist_if_dirty(&blob_store).await;

        let reloaded = FavoritesStore::load(&blob_store).await;
        assert_eq!(
            shelves(&reloaded),
            vec![("/works/1".into(), 1), ("/works/3".into(), 2)]
        );
    }

    #[tokio::test]
    async fn failed_write_keeps_memory_state() {
        let blob_store = MemoryBlobStore {
            fail_writes: true,
            ..Default::default()
        };
        let mut store = FavoritesStore::default();
        store.add(dune());
        store.persist_if_dirty(&blob_store).await;
        assert_eq!(store.len(), 1);
        assert!(store.dirty);
        assert_eq!(blob_store.raw(FAVORITES_STORAGE_KEY), None);
    }
}
