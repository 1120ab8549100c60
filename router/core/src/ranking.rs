//! Endpoint Ranking
//!
//! Orders candidates by dominance over their recent history.
//!
//! Endpoint A ranks ahead of B only when A has strictly fewer failures *and*
//! a strictly lower average latency. Anything else (one axis better, the other
//! worse or equal) leaves the pair incomparable.
//!
//! This relation is not a strict weak ordering: incomparability is not
//! transitive, so the result of a sort depends on input order and on the
//! algorithm. Ranking therefore uses a stable insertion sort that only moves
//! an element past a neighbour it dominates, which keeps incomparable
//! candidates in the order the caller supplied them.
//!
//! ```text
//!   A = (1 failure, 10ms)   B = (3 failures, 50ms)   -> A ahead of B
//!   A = (1 failure, 50ms)   B = (3 failures, 10ms)   -> incomparable
//! ```

use std::cmp::Ordering;
use std::time::Duration;

// ============================================================================
// Score
// ============================================================================

/// Aggregates an endpoint is ranked on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score {
    /// Failures in the current window
    pub failures: usize,

    /// Window-wide average latency
    pub average_latency: Duration,
}

impl Score {
    /// Whether this score is strictly better than `other` on every axis
    #[must_use]
    pub fn dominates(&self, other: &Score) -> bool {
        self.failures < other.failures && self.average_latency < other.average_latency
    }
}

/// Partial comparison by dominance
///
/// `Less` means `a` ranks ahead of `b`. Pairs where neither dominates compare
/// `Equal`, which does not imply they are interchangeable with a third score.
#[must_use]
pub fn compare(a: &Score, b: &Score) -> Ordering {
    if a.dominates(b) {
        Ordering::Less
    } else if b.dominates(a) {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

// ============================================================================
// Ranking
// ============================================================================

/// Sort scored items best-first, preserving input order for incomparable pairs
///
/// Uses insertion sort rather than `slice::sort_by`: the standard sorts
/// require a total order and may panic when handed a non-transitive one.
/// Candidate lists are short, so the quadratic worst case is irrelevant.
pub fn rank<T>(items: &mut [(T, Score)]) {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j].1, &items[j - 1].1) == Ordering::Less {
            items.swap(j, j - 1);
            j -= 1;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
