//! Integration tests for the file-backed search history.
//!
//! Exercises the full path the app takes: a `RecentSearchStore` over a
//! `JsonFileStore`, including hydration from disk after a "restart"
//! (a fresh store instance over the same directory).

#![allow(clippy::expect_used)]

use std::sync::Arc;

use cirrus_search::{JsonFileStore, ManualClock, RecentSearchStore};

#[tokio::test]
async fn test_history_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = Arc::new(ManualClock::new(1_000));

    {
        let storage = Arc::new(JsonFileStore::new(dir.path()));
        let store = RecentSearchStore::new(storage, clock.clone());
        store.add("Paris").await.expect("add paris");
        clock.set(2_000);
        store.add("London").await.expect("add london");
    }

    // Fresh instance over the same directory hydrates the same history.
    let storage = Arc::new(JsonFileStore::new(dir.path()));
    let store = RecentSearchStore::new(storage, clock);
    let terms: Vec<_> = store.load().await.into_iter().map(|e| e.term).collect();
    assert_eq!(terms, vec!["london", "paris"]);
}

#[tokio::test]
async fn test_remove_persists_across_instances() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = Arc::new(ManualClock::new(1));

    let storage = Arc::new(JsonFileStore::new(dir.path()));
    let store = RecentSearchStore::new(storage, clock.clone());
    store.add("paris").await.expect("add");
    store.add("london").await.expect("add");
    store.remove("paris").await.expect("remove");

    let storage = Arc::new(JsonFileStore::new(dir.path()));
    let store = RecentSearchStore::new(storage, clock);
    let terms: Vec<_> = store.load().await.into_iter().map(|e| e.term).collect();
    assert_eq!(terms, vec!["london"]);
}

#[tokio::test]
async fn test_missing_directory_reads_as_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("never-created");

    let storage = Arc::new(JsonFileStore::new(missing));
    let store = RecentSearchStore::new(storage, Arc::new(ManualClock::new(1)));
    assert!(store.load().await.is_empty());
}
