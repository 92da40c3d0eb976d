//! Durable, deduplicated, recency-ordered record of past search terms.

use std::sync::Arc;

use crate::clock::Clock;
use crate::storage::{KeyValueStore, StorageError};
use crate::types::{normalize, SearchEntry, SearchError};

const STORAGE_KEY: &str = "searches";

/// Persisted search history.
///
/// The store is the sole owner of its storage key: every mutation reads the
/// full collection, modifies it in memory, and writes the full collection back
/// in a single `set`. An unreadable or corrupt collection is treated as empty;
/// only write failures are surfaced. Concurrent writers from multiple
/// processes can race and the last write wins.
pub struct RecentSearchStore {
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    key: String,
    max_entries: usize,
}

impl RecentSearchStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock, key: STORAGE_KEY.to_string(), max_entries: 0 }
    }

    /// Cap the persisted history at `max` entries, dropping the oldest.
    /// Zero means unlimited.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Load the full history, sorted most-recent-first.
    ///
    /// Never fails: a missing or unparseable collection yields an empty list.
    pub async fn load(&self) -> Vec<SearchEntry> {
        let mut entries = self.read_entries().await;
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    /// Record a search. The term is normalized first; re-adding an existing
    /// term refreshes its timestamp instead of duplicating it.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::EmptyTerm` if the term is empty after
    /// normalization, or `SearchError::Persistence` if the write fails. On a
    /// failed write the durable collection is unchanged and the next `load`
    /// reflects the pre-add state.
    pub async fn add(&self, term: &str) -> Result<SearchEntry, SearchError> {
        let term = normalize(term);
        if term.is_empty() {
            return Err(SearchError::EmptyTerm);
        }

        let mut entries = self.read_entries().await;
        let entry = SearchEntry { term: term.clone(), timestamp: self.clock.now_ms() };

        match entries.iter_mut().find(|e| e.term == term) {
            Some(existing) => existing.timestamp = entry.timestamp,
            None => entries.push(entry.clone()),
        }

        if self.max_entries > 0 && entries.len() > self.max_entries {
            entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            entries.truncate(self.max_entries);
        }

        self.persist(&entries).await?;
        tracing::debug!(term = %entry.term, "Recorded search");
        Ok(entry)
    }

    /// Remove a term from the history. Removing an absent term is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Persistence` if the write fails.
    pub async fn remove(&self, term: &str) -> Result<(), SearchError> {
        let term = normalize(term);
        let mut entries = self.read_entries().await;
        let before = entries.len();
        entries.retain(|e| e.term != term);

        if entries.len() == before {
            tracing::debug!(term = %term, "Remove of absent term ignored");
            return Ok(());
        }

        self.persist(&entries).await?;
        Ok(())
    }

    async fn read_entries(&self) -> Vec<SearchEntry> {
        let raw = match self.storage.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::debug!("Search history unreadable, treating as empty: {}", e);
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::debug!("Search history corrupt, treating as empty: {}", e);
            Vec::new()
        })
    }

    async fn persist(&self, entries: &[SearchEntry]) -> Result<(), StorageError> {
        let payload = serde_json::to_string(entries)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        self.storage.set(&self.key, &payload).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;

    fn store_with(clock: Arc<ManualClock>) -> (Arc<MemoryStore>, RecentSearchStore) {
        let storage = Arc::new(MemoryStore::new());
        let store = RecentSearchStore::new(storage.clone(), clock);
        (storage, store)
    }

    #[tokio::test]
    async fn test_add_then_load_roundtrip() {
        let clock = Arc::new(ManualClock::new(1_000));
        let (_, store) = store_with(clock);

        store.add("Paris").await.unwrap();
        let entries = store.load().await;

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].term, "paris");
        assert_eq!(entries[0].timestamp, 1_000);
    }

    #[tokio::test]
    async fn test_readd_refreshes_timestamp_without_duplicating() {
        let clock = Arc::new(ManualClock::new(1_000));
        let (_, store) = store_with(clock.clone());

        store.add("paris").await.unwrap();
        clock.set(2_000);
        store.add("PARIS").await.unwrap();

        let entries = store.load().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].term, "paris");
        assert_eq!(entries[0].timestamp, 2_000);
    }

    #[tokio::test]
    async fn test_load_sorts_most_recent_first() {
        let clock = Arc::new(ManualClock::new(1));
        let (_, store) = store_with(clock.clone());

        store.add("oslo").await.unwrap();
        clock.set(3);
        store.add("lima").await.unwrap();
        clock.set(2);
        store.add("cairo").await.unwrap();

        let terms: Vec<_> = store.load().await.into_iter().map(|e| e.term).collect();
        assert_eq!(terms, vec!["lima", "cairo", "oslo"]);

        let timestamps: Vec<_> = store.load().await.into_iter().map(|e| e.timestamp).collect();
        assert!(timestamps.windows(2).all(|w| w[0] > w[1]));
    }

    #[tokio::test]
    async fn test_remove_absent_term_is_noop() {
        let clock = Arc::new(ManualClock::new(1));
        let (_, store) = store_with(clock);

        store.add("paris").await.unwrap();
        store.remove("london").await.unwrap();

        let entries = store.load().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].term, "paris");
    }

    #[tokio::test]
    async fn test_remove_normalizes_term() {
        let clock = Arc::new(ManualClock::new(1));
        let (_, store) = store_with(clock);

        store.add("paris").await.unwrap();
        store.remove("  PARIS ").await.unwrap();
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_term_rejected() {
        let clock = Arc::new(ManualClock::new(1));
        let (_, store) = store_with(clock);

        assert!(matches!(store.add("   ").await, Err(SearchError::EmptyTerm)));
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_payload_degrades_to_empty() {
        let clock = Arc::new(ManualClock::new(1));
        let (storage, store) = store_with(clock);

        storage.set("searches", "not json{").await.unwrap();
        assert!(store.load().await.is_empty());

        // The store recovers: the next add starts a fresh collection.
        store.add("paris").await.unwrap();
        assert_eq!(store.load().await.len(), 1);
    }

    #[tokio::test]
    async fn test_write_failure_surfaces_and_rolls_back() {
        let clock = Arc::new(ManualClock::new(1));
        let (storage, store) = store_with(clock);

        store.add("paris").await.unwrap();
        storage.fail_writes(true);

        let err = store.add("london").await;
        assert!(matches!(err, Err(SearchError::Persistence(_))));

        storage.fail_writes(false);
        let terms: Vec<_> = store.load().await.into_iter().map(|e| e.term).collect();
        assert_eq!(terms, vec!["paris"]);
    }

    #[tokio::test]
    async fn test_max_entries_drops_oldest() {
        let clock = Arc::new(ManualClock::new(1));
        let storage = Arc::new(MemoryStore::new());
        let store = RecentSearchStore::new(storage, clock.clone()).with_max_entries(2);

        store.add("oslo").await.unwrap();
        clock.set(2);
        store.add("lima").await.unwrap();
        clock.set(3);
        store.add("cairo").await.unwrap();

        let terms: Vec<_> = store.load().await.into_iter().map(|e| e.term).collect();
        assert_eq!(terms, vec!["cairo", "lima"]);
    }
}
