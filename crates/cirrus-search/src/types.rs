use serde::{Deserialize, Serialize};

use crate::storage::StorageError;

/// A persisted search record.
///
/// `term` is the dedupe key and is always stored normalized (trimmed,
/// lowercased). `timestamp` is milliseconds since the Unix epoch and is used
/// only for recency ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub term: String,
    #[serde(rename = "time")]
    pub timestamp: i64,
}

/// A candidate place returned by the autocomplete provider.
///
/// Suggestions live for a single query cycle and are never persisted; `key`
/// identifies the suggestion to the upstream provider and is only useful for
/// rendering identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub label: String,
    pub key: String,
}

/// Normalize a search term for use as a dedupe key.
pub fn normalize(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Search history errors surfaced to callers.
///
/// Read-path failures are not represented here: an unreadable or corrupt
/// collection degrades to an empty list instead of failing the caller.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Failed to persist search history: {0}")]
    Persistence(#[from] StorageError),
    #[error("Search term is empty after normalization")]
    EmptyTerm,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize("  London  "), "london");
        assert_eq!(normalize("PARIS"), "paris");
        assert_eq!(normalize("new york"), "new york");
    }

    #[test]
    fn test_entry_serializes_with_time_field() {
        let entry = SearchEntry { term: "paris".to_string(), timestamp: 1700000000000 };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["term"], "paris");
        assert_eq!(json["time"], 1700000000000i64);
    }

    #[test]
    fn test_entry_roundtrip() {
        let raw = r#"{"term":"oslo","time":42}"#;
        let entry: SearchEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.term, "oslo");
        assert_eq!(entry.timestamp, 42);
    }
}
