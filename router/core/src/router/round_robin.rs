//! Round-Robin Router
//!
//! Distributes selections evenly across the candidate list in order. Ignores
//! feedback.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::Router;
use crate::error::RouterError;

/// Router that cycles through candidates
#[derive(Debug, Default)]
pub struct RoundRobinRouter {
    counter: AtomicUsize,
}

impl RoundRobinRouter {
    /// Create a new round-robin router
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Router for RoundRobinRouter {
    fn name(&self) -> &'static str {
        "round_robin"
    }

    fn select_best(&self, candidates: &[String]) -> Result<String, RouterError> {
        if candidates.is_empty() {
            tracing::warn!("Selection rejected: no candidates supplied");
            return Err(RouterError::no_candidates());
        }

        let idx = self.counter.fetch_add(1, Ordering::Relaxed) % candidates.len();
        tracing::debug!(
            strategy = self.name(),
            endpoint = %candidates[idx],
            candidates = candidates.len(),
            "Selected endpoint"
        );
        Ok(candidates[idx].clone())
    }

    fn record_result(&self, latency: Duration, endpoint: &str, success: bool) {
        tracing::trace!(
            endpoint,
            latency_us = latency.as_micros() as u64,
            success,
            "Ignoring result"
        );
    }
}
