//! Adaptive Router
//!
//! Ranks candidates by their recent failures and latency and feeds request
//! outcomes back into per-endpoint history.
//!
//! # Locking
//!
//! The history map sits behind a single reader/writer lock:
//! - selection takes the read lock, so any number of selections run in
//!   parallel and never grow the map
//! - feedback takes the write lock for the whole lookup-or-insert plus ring
//!   write, so writers serialize
//!
//! Histories are created only by feedback and are never removed.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::time::Duration;

use parking_lot::RwLock;

use super::{first_ranked, rank_candidates, Router};
use crate::error::RouterError;
use crate::history::{EndpointHistory, EndpointSnapshot};

/// Latency- and failure-aware router over a single lock
pub struct AdaptiveRouter {
    /// Per-endpoint history, created lazily by feedback
    histories: RwLock<HashMap<String, EndpointHistory>>,

    /// Window size for every history this router creates
    window: NonZeroUsize,
}

impl AdaptiveRouter {
    /// Create a router whose histories hold `window` observations each
    #[must_use]
    pub fn new(window: NonZeroUsize) -> Self {
        Self {
            histories: RwLock::new(HashMap::new()),
            window,
        }
    }

    /// Create a router from a plain window size
    ///
    /// # Errors
    ///
    /// Returns `RouterError::InvalidInput` if `window_size` is zero.
    pub fn with_window_size(window_size: usize) -> Result<Self, RouterError> {
        NonZeroUsize::new(window_size)
            .map(Self::new)
            .ok_or_else(|| RouterError::InvalidInput("window size must be positive".to_string()))
    }

    /// Observations kept per endpoint
    #[must_use]
    pub fn window_size(&self) -> usize {
        self.window.get()
    }

    /// Rank all candidates best-first
    ///
    /// [`Router::select_best`] returns the head of this list.
    ///
    /// # Errors
    ///
    /// Returns `RouterError::InvalidInput` if `candidates` is empty.
    pub fn rank(&self, candidates: &[String]) -> Result<Vec<String>, RouterError> {
        let histories = self.histories.read();
        let ranked = rank_candidates(candidates, self.window, |endpoint| {
            histories.get(endpoint).map(EndpointHistory::score)
        })?;
        Ok(ranked.into_iter().map(|(endpoint, _)| endpoint.clone()).collect())
    }

    /// Number of endpoints with stored history
    #[must_use]
    pub fn endpoint_count(&self) -> usize {
        self.histories.read().len()
    }

    /// Endpoints with stored history, sorted
    #[must_use]
    pub fn endpoints(&self) -> Vec<String> {
        let mut endpoints: Vec<String> = self.histories.read().keys().cloned().collect();
        endpoints.sort();
        endpoints
    }

    /// Get snapshot for a specific endpoint
    #[must_use]
    pub fn snapshot(&self, endpoint: &str) -> Option<EndpointSnapshot> {
        self.histories.read().get(endpoint).map(EndpointHistory::snapshot)
    }
}

impl Router for AdaptiveRouter {
    fn name(&self) -> &'static str {
        "adaptive"
    }

    fn select_best(&self, candidates: &[String]) -> Result<String, RouterError> {
        let histories = self.histories.read();
        let ranked = rank_candidates(candidates, self.window, |endpoint| {
            histories.get(endpoint).map(EndpointHistory::score)
        })?;
        first_ranked(&ranked, self.name())
    }

    fn record_result(&self, latency: Duration, endpoint: &str, success: bool) {
        let mut histories = self.histories.write();
        match histories.entry(endpoint.to_owned()) {
            Entry::Occupied(mut entry) => entry.get_mut().record_result(latency, !success),
            Entry::Vacant(entry) => {
                tracing::info!(
                    endpoint,
                    window = self.window.get(),
                    "Tracking new endpoint"
                );
                entry
                    .insert(EndpointHistory::new(endpoint, self.window))
                    .record_result(latency, !success);
            }
        }

        tracing::trace!(
            endpoint,
            latency_us = latency.as_micros() as u64,
            success,
            "Recorded result"
        );
    }

    fn snapshots(&self) -> Vec<EndpointSnapshot> {
        let mut snapshots: Vec<EndpointSnapshot> = self
            .histories
            .read()
            .values()
            .map(EndpointHistory::snapshot)
            .collect();
        snapshots.sort_by(|a, b| a.endpoint.cmp(&b.endpoint));
        snapshots
    }
}

impl std::fmt::Debug for AdaptiveRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdaptiveRouter")
            .field("window", &self.window)
            .field("endpoints", &self.endpoint_count())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
