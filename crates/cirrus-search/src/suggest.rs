//! Debounced place-name suggestions.
//!
//! `PlaceSuggester` sits between raw keystroke input and the autocomplete
//! provider. Each input change starts a new debounce cycle stamped with a
//! generation number; only the cycle armed by the newest keystroke is allowed
//! to query the provider and publish results. Superseded cycles wake, notice
//! a newer generation, and bow out without calling the provider; a result
//! already in flight when a newer keystroke lands is discarded, not applied.
//! Provider failures degrade to an empty suggestion list, since suggestions
//! are an optional enhancement to typed search.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::provider::PlaceProvider;
use crate::store::RecentSearchStore;
use crate::types::{SearchError, Suggestion};

/// Quiet interval after the last keystroke before a query fires.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Inputs shorter than this never reach the provider.
pub const MIN_QUERY_LEN: usize = 3;

/// Debounced, cancellable autocomplete pipeline.
///
/// Owns no persisted state; all timer and in-flight query state is invalidated
/// on every new keystroke and on `shutdown`.
pub struct PlaceSuggester {
    provider: Arc<dyn PlaceProvider>,
    store: Arc<RecentSearchStore>,
    debounce: Duration,
    min_query_len: usize,
    generation: Arc<AtomicU64>,
    tx: watch::Sender<Vec<Suggestion>>,
    rx: watch::Receiver<Vec<Suggestion>>,
    cancel: CancellationToken,
}

impl PlaceSuggester {
    pub fn new(provider: Arc<dyn PlaceProvider>, store: Arc<RecentSearchStore>) -> Self {
        Self::with_settings(provider, store, DEBOUNCE, MIN_QUERY_LEN)
    }

    pub fn with_settings(
        provider: Arc<dyn PlaceProvider>,
        store: Arc<RecentSearchStore>,
        debounce: Duration,
        min_query_len: usize,
    ) -> Self {
        let (tx, rx) = watch::channel(Vec::new());
        Self {
            provider,
            store,
            debounce,
            min_query_len,
            generation: Arc::new(AtomicU64::new(0)),
            tx,
            rx,
            cancel: CancellationToken::new(),
        }
    }

    /// Feed the current input value. Arms a fresh debounce cycle and
    /// invalidates every earlier one. Too-short input clears the suggestion
    /// list immediately without contacting the provider.
    pub fn on_input(&self, text: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let query = text.trim().to_string();
        if query.chars().count() < self.min_query_len {
            self.tx.send_replace(Vec::new());
            return;
        }

        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let generations = Arc::clone(&self.generation);
        let debounce = self.debounce;
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => return,
                () = tokio::time::sleep(debounce) => {}
            }
            // A later keystroke supersedes this cycle before it ever queries.
            if generations.load(Ordering::SeqCst) != generation {
                return;
            }

            let suggestions = match provider.search_cities(&query).await {
                Ok(suggestions) => suggestions,
                Err(e) => {
                    tracing::debug!("Autocomplete query failed: {}", e);
                    Vec::new()
                }
            };

            // The request may have raced a newer keystroke or teardown while
            // in flight; a stale result is discarded, never applied.
            if cancel.is_cancelled() || generations.load(Ordering::SeqCst) != generation {
                return;
            }
            tx.send_replace(suggestions);
        });
    }

    /// Snapshot of the currently published suggestions.
    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.rx.borrow().clone()
    }

    /// Watch suggestion updates as they are published.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Suggestion>> {
        self.rx.clone()
    }

    /// Record a typed submission and hand back the normalized term for the
    /// navigation layer. Clears suggestions and invalidates pending cycles.
    ///
    /// # Errors
    ///
    /// Propagates `RecentSearchStore::add` failures.
    pub async fn submit(&self, text: &str) -> Result<String, SearchError> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.tx.send_replace(Vec::new());

        let entry = self.store.add(text).await?;
        Ok(entry.term)
    }

    /// Record a picked suggestion. Only the primary component of the label
    /// (the city itself, before the first comma) becomes the search term.
    ///
    /// # Errors
    ///
    /// Propagates `RecentSearchStore::add` failures.
    pub async fn select(&self, suggestion: &Suggestion) -> Result<String, SearchError> {
        let city = suggestion.label.split(',').next().unwrap_or(&suggestion.label).trim();
        self.submit(city).await
    }

    /// Tear down the session: wakes and cancels any pending debounce timer
    /// and orphans any in-flight request so its result is never applied.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for PlaceSuggester {
    fn drop(&mut self) {
        self.shutdown();
    }
}
