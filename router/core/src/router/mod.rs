//! Endpoint Routing
//!
//! Strategies for choosing one endpoint out of a list of functionally
//! equivalent candidates, fed back with the outcome of each request.
//!
//! # Usage
//!
//! ```text
//!   caller                         router
//!     | select_best(candidates) ---> |  rank by recent history
//!     | <--------------- endpoint -- |
//!     |  ... perform request ...     |
//!     | record_result(latency, ok) ->|  update that endpoint's window
//! ```
//!
//! # Strategies
//!
//! - [`AdaptiveRouter`]: dominance ranking over per-endpoint history, one
//!   reader/writer lock around the history map
//! - [`ShardedAdaptiveRouter`]: same policy with per-shard locks
//! - [`RoundRobinRouter`]: ignores history, cycles through candidates

mod adaptive;
mod round_robin;
mod sharded;

pub use adaptive::AdaptiveRouter;
pub use round_robin::RoundRobinRouter;
pub use sharded::ShardedAdaptiveRouter;

use std::num::NonZeroUsize;
use std::time::Duration;

use crate::error::RouterError;
use crate::history::{EndpointHistory, EndpointSnapshot};
use crate::ranking::{self, Score};

// ============================================================================
// Router Trait
// ============================================================================

/// Endpoint selection strategy
///
/// Implementations must be safe to share between threads; selection and
/// feedback may be called concurrently from any number of callers.
///
/// # Example
///
/// ```ignore
/// let endpoint = router.select_best(&candidates)?;
/// let started = Instant::now();
/// let ok = send(&endpoint).await.is_ok();
/// router.record_result(started.elapsed(), &endpoint, ok);
/// ```
pub trait Router: Send + Sync {
    /// Short name of this strategy
    fn name(&self) -> &'static str;

    /// Pick the endpoint to send the next request to
    ///
    /// # Errors
    ///
    /// Returns `RouterError::InvalidInput` if `candidates` is empty.
    fn select_best(&self, candidates: &[String]) -> Result<String, RouterError>;

    /// Report how a request to `endpoint` went
    ///
    /// `success` is decided by the caller, e.g. no transport error and a
    /// 2xx status.
    fn record_result(&self, latency: Duration, endpoint: &str, success: bool);

    /// Snapshots of every endpoint the strategy keeps history for
    fn snapshots(&self) -> Vec<EndpointSnapshot> {
        Vec::new()
    }
}

// ============================================================================
// Shared Ranking
// ============================================================================

/// Score every candidate and rank them best-first
///
/// `lookup` returns the stored score for an endpoint; unknown endpoints are
/// scored from a transient, zero-initialized history that is never stored.
fn rank_candidates<'a, F>(
    candidates: &'a [String],
    window: NonZeroUsize,
    mut lookup: F,
) -> Result<Vec<(&'a String, Score)>, RouterError>
where
    F: FnMut(&str) -> Option<Score>,
{
    if candidates.is_empty() {
        tracing::warn!("Selection rejected: no candidates supplied");
        return Err(RouterError::no_candidates());
    }

    let mut scored: Vec<(&String, Score)> = candidates
        .iter()
        .map(|endpoint| {
            let score = lookup(endpoint)
                .unwrap_or_else(|| EndpointHistory::new(endpoint.as_str(), window).score());
            (endpoint, score)
        })
        .collect();

    ranking::rank(&mut scored);
    Ok(scored)
}

/// Head of a ranking produced by [`rank_candidates`]
fn first_ranked(
    ranked: &[(&String, Score)],
    strategy: &'static str,
) -> Result<String, RouterError> {
    let (endpoint, score) = ranked.first().ok_or_else(RouterError::no_candidates)?;

    tracing::debug!(
        strategy,
        endpoint = %endpoint,
        candidates = ranked.len(),
        failures = score.failures,
        avg_latency_us = score.average_latency.as_micros() as u64,
        "Selected endpoint"
    );

    Ok((*endpoint).clone())
}
