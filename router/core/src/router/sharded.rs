//! Sharded Adaptive Router
//!
//! Same selection and feedback policy as [`AdaptiveRouter`](super::AdaptiveRouter),
//! with histories kept in a `DashMap` so feedback for endpoints in different
//! shards proceeds in parallel.
//!
//! Selection reads one candidate at a time and releases each shard guard
//! before touching the next, so a selection never holds two guards at once.

use std::num::NonZeroUsize;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{first_ranked, rank_candidates, Router};
use crate::error::RouterError;
use crate::history::{EndpointHistory, EndpointSnapshot};
use crate::ranking::Score;

/// Latency- and failure-aware router with per-shard locking
pub struct ShardedAdaptiveRouter {
    /// Per-endpoint history, created lazily by feedback
    histories: DashMap<String, EndpointHistory>,

    /// Window size for every history this router creates
    window: NonZeroUsize,
}

impl ShardedAdaptiveRouter {
    /// Create a router whose histories hold `window` observations each
    #[must_use]
    pub fn new(window: NonZeroUsize) -> Self {
        Self {
            histories: DashMap::new(),
            window,
        }
    }

    /// Observations kept per endpoint
    #[must_use]
    pub fn window_size(&self) -> usize {
        self.window.get()
    }

    /// Rank all candidates best-first
    ///
    /// # Errors
    ///
    /// Returns `RouterError::InvalidInput` if `candidates` is empty.
    pub fn rank(&self, candidates: &[String]) -> Result<Vec<String>, RouterError> {
        let ranked = rank_candidates(candidates, self.window, |endpoint| self.score(endpoint))?;
        Ok(ranked.into_iter().map(|(endpoint, _)| endpoint.clone()).collect())
    }

    /// Number of endpoints with stored history
    #[must_use]
    pub fn endpoint_count(&self) -> usize {
        self.histories.len()
    }

    /// Endpoints with stored history, sorted
    #[must_use]
    pub fn endpoints(&self) -> Vec<String> {
        let mut endpoints: Vec<String> = self.histories.iter().map(|e| e.key().clone()).collect();
        endpoints.sort();
        endpoints
    }

    /// Get snapshot for a specific endpoint
    #[must_use]
    pub fn snapshot(&self, endpoint: &str) -> Option<EndpointSnapshot> {
        self.histories.get(endpoint).map(|h| h.snapshot())
    }

    fn score(&self, endpoint: &str) -> Option<Score> {
        self.histories.get(endpoint).map(|h| h.score())
    }
}

impl Router for ShardedAdaptiveRouter {
    fn name(&self) -> &'static str {
        "sharded"
    }

    fn select_best(&self, candidates: &[String]) -> Result<String, RouterError> {
        let ranked = rank_candidates(candidates, self.window, |endpoint| self.score(endpoint))?;
        first_ranked(&ranked, self.name())
    }

    fn record_result(&self, latency: Duration, endpoint: &str, success: bool) {
        match self.histories.entry(endpoint.to_owned()) {
            Entry::Occupied(mut entry) => entry.get_mut().record_result(latency, !success),
            Entry::Vacant(entry) => {
                tracing::info!(
                    endpoint,
                    window = self.window.get(),
                    "Tracking new endpoint"
                );
                let mut history = EndpointHistory::new(endpoint, self.window);
                history.record_result(latency, !success);
                entry.insert(history);
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
        let mut snapshots: Vec<EndpointSnapshot> =
            self.histories.iter().map(|e| e.value().snapshot()).collect();
        snapshots.sort_by(|a, b| a.endpoint.cmp(&b.endpoint));
        snapshots
    }
}

impl std::fmt::Debug for ShardedAdaptiveRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedAdaptiveRouter")
            .field("window", &self.window)
            .field("endpoints", &self.endpoint_count())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
