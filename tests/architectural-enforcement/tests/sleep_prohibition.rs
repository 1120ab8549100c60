//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Router and simulator production code MUST NOT sleep.
//! Simulated latency is sampled and reported, never waited out; concurrent
//! callers coordinate through locks, not timing.

use architectural_enforcement::{report, scan_dirs, Rule};

const SLEEP: Rule = Rule {
    name: "Sleep call",
    patterns: &["sleep(", "sleep_ms(", "sleep_until("],
};

#[test]
fn test_no_sleep_in_production_code() {
    let violations = scan_dirs(&["router/core/src", "router/sim/src"], &[SLEEP]);

    report(
        &violations,
        "Sleep calls found in production code!",
        &[
            "❌ FORBIDDEN:",
            "  - Sleeping to simulate endpoint latency",
            "  - Sleep as poor man's synchronization",
            "✅ ACCEPTABLE:",
            "  - Test code (#[cfg(test)] modules, tests/ directories)",
        ],
    );
}
