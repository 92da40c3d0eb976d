//! Search subsystem for Cirrus
//!
//! Durable recent-search history plus debounced city-name autocomplete.
//! `RecentSearchStore` owns the persisted, deduplicated, recency-ordered list
//! of past search terms; `PlaceSuggester` turns raw keystrokes into a
//! debounced, cancellable stream of place suggestions.

pub mod clock;
pub mod provider;
pub mod storage;
pub mod store;
pub mod suggest;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use provider::{NominatimPlaces, PlaceProvider, ProviderError};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::RecentSearchStore;
pub use suggest::PlaceSuggester;
pub use types::{normalize, SearchEntry, SearchError, Suggestion};
