//! Endpoint History
//!
//! Rolling record of the most recent request outcomes for a single endpoint.
//!
//! # Layout
//!
//! ```text
//!   latencies: [Duration; N]   outcomes: [bool; N]   (true = failure)
//!   cursor: next slot to overwrite
//!
//!   latencies = [12ms, 40ms, 0ms]
//!   outcomes  = [false, true, false]
//!   cursor    = 2
//! ```
//!
//! Both buffers are allocated once at full length and zero-filled. Unwritten
//! slots count as instant successes, so an endpoint with little history scores
//! as well as or better than one with a real track record. Aggregates always
//! divide by the full window, never by the number of slots written.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::Serialize;

use crate::ranking::Score;

// ============================================================================
// Endpoint History
// ============================================================================

/// Fixed-capacity ring of latencies and failure flags for one endpoint
#[derive(Clone, Debug)]
pub struct EndpointHistory {
    /// Endpoint identifier
    endpoint: String,

    /// Observed latencies, index-aligned with `outcomes`
    latencies: Box<[Duration]>,

    /// Failure flags (true = failed request)
    outcomes: Box<[bool]>,

    /// Next slot to overwrite, always in `[0, window)`
    cursor: usize,
}

impl EndpointHistory {
    /// Create a zero-initialized history holding `window` observations
    #[must_use]
    pub fn new(endpoint: impl Into<String>, window: NonZeroUsize) -> Self {
        let window = window.get();
        Self {
            endpoint: endpoint.into(),
            latencies: vec![Duration::ZERO; window].into_boxed_slice(),
            outcomes: vec![false; window].into_boxed_slice(),
            cursor: 0,
        }
    }

    /// Endpoint this history belongs to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Number of slots in the window
    #[must_use]
    pub fn window_size(&self) -> usize {
        self.latencies.len()
    }

    /// Slot the next observation will overwrite
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Record one observation, evicting the oldest once the window is full
    pub fn record_result(&mut self, latency: Duration, is_failure: bool) {
        self.latencies[self.cursor] = latency;
        self.outcomes[self.cursor] = is_failure;
        self.cursor = (self.cursor + 1) % self.latencies.len();
    }

    /// Number of failures across every slot in the window
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|&&failed| failed).count()
    }

    /// Sum of every latency slot divided by the window size
    ///
    /// Unwritten slots contribute zero, which pulls the average of a young
    /// history toward zero until the window fills.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let total: u128 = self.latencies.iter().map(Duration::as_nanos).sum();
        let average = total / self.latencies.len() as u128;
        Duration::from_nanos(u64::try_from(average).unwrap_or(u64::MAX))
    }

    /// Ranking score derived from the current window
    #[must_use]
    pub fn score(&self) -> Score {
        Score {
            failures: self.failure_count(),
            average_latency: self.average_latency(),
        }
    }

    /// Get a snapshot of the current window aggregates
    #[must_use]
    pub fn snapshot(&self) -> EndpointSnapshot {
        EndpointSnapshot {
            endpoint: self.endpoint.clone(),
            failure_count: self.failure_count(),
            average_latency: self.average_latency(),
            window_size: self.window_size(),
        }
    }
}

// ============================================================================
// Endpoint Snapshot
// ============================================================================

/// Immutable view of an endpoint's window aggregates
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EndpointSnapshot {
    /// Endpoint identifier
    pub endpoint: String,

    /// Failures currently in the window
    pub failure_count: usize,

    /// Window-wide average latency
    pub average_latency: Duration,

    /// Size of the window the aggregates were taken over
    pub window_size: usize,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn window(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_new_history_is_zeroed() {
        let history = EndpointHistory::new("http://a:8983", window(4));

        assert_eq!(history.endpoint(), "http://a:8983");
        assert_eq!(history.window_size(), 4);
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.failure_count(), 0);
        assert_eq!(history.average_latency(), Duration::ZERO);
    }

    #[test]
    fn test_record_advances_cursor_and_wraps() {
        let mut history = EndpointHistory::new("a", window(3));

        history.record_result(ms(1), false);
        assert_eq!(history.cursor(), 1);
        history.record_result(ms(1), false);
        assert_eq!(history.cursor(), 2);
        history.record_result(ms(1), false);
        assert_eq!(history.cursor(), 0);
        history.record_result(ms(1), false);
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn test_average_divides_by_full_window() {
        let mut history = EndpointHistory::new("a", window(4));

        history.record_result(ms(40), false);

        // One real sample, three zero slots
        assert_eq!(history.average_latency(), ms(10));
    }

    #[test]
    fn test_average_after_full_window() {
        let mut history = EndpointHistory::new("a", window(3));

        history.record_result(ms(10), false);
        history.record_result(ms(20), false);
        history.record_result(ms(30), false);
        assert_eq!(history.average_latency(), ms(20));

        // Oldest sample (10ms) is evicted
        history.record_result(ms(60), false);
        assert_eq!(history.average_latency(), ms(110) / 3);
    }

    #[test]
    fn test_failure_count_tracks_window() {
        let mut history = EndpointHistory::new("a", window(3));

        history.record_result(ms(5), true);
        history.record_result(ms(5), true);
        history.record_result(ms(5), false);
        assert_eq!(history.failure_count(), 2);

        // Overwrites the first failure
        history.record_result(ms(5), false);
        assert_eq!(history.failure_count(), 1);

        history.record_result(ms(5), false);
        assert_eq!(history.failure_count(), 0);
    }

    #[test]
    fn test_window_of_one() {
        let mut history = EndpointHistory::new("a", window(1));

        history.record_result(ms(7), true);
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.failure_count(), 1);
        assert_eq!(history.average_latency(), ms(7));

        history.record_result(ms(3), false);
        assert_eq!(history.failure_count(), 0);
        assert_eq!(history.average_latency(), ms(3));
    }

    #[test]
    fn test_huge_latencies_do_not_overflow() {
        let mut history = EndpointHistory::new("a", window(2));

        history.record_result(Duration::MAX, false);
        history.record_result(Duration::MAX, false);

        assert_eq!(history.average_latency(), Duration::from_nanos(u64::MAX));
    }

    #[test]
    fn test_score_and_snapshot() {
        let mut history = EndpointHistory::new("a", window(2));
        history.record_result(ms(30), true);
        history.record_result(ms(10), false);

        let score = history.score();
        assert_eq!(score.failures, 1);
        assert_eq!(score.average_latency, ms(20));

        let snapshot = history.snapshot();
        assert_eq!(snapshot.endpoint, "a");
        assert_eq!(snapshot.failure_count, 1);
        assert_eq!(snapshot.average_latency, ms(20));
        assert_eq!(snapshot.window_size, 2);
    }
}
