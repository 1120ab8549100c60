//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: The selection and feedback paths (history, ranking and every
//! router strategy) are called inline with the caller's requests and MUST
//! NOT touch the filesystem, the network or spawn threads.
//!
//! Configuration loading reads its file once at startup and is not scanned.

use architectural_enforcement::{report, scan_dirs, Rule};

const HOT_PATH: &[&str] = &[
    "router/core/src/history.rs",
    "router/core/src/ranking.rs",
    "router/core/src/router",
];

const RULES: &[Rule] = &[
    Rule {
        name: "Blocking file I/O",
        patterns: &["std::fs", "File::open", "File::create"],
    },
    Rule {
        name: "Blocking network I/O",
        patterns: &["std::net", "TcpStream", "UdpSocket"],
    },
    Rule {
        name: "Thread spawn",
        patterns: &["thread::spawn", "std::thread"],
    },
    Rule {
        name: "Blocking process I/O",
        patterns: &["std::process::Command"],
    },
];

#[test]
fn test_no_blocking_io_on_hot_path() {
    let violations = scan_dirs(HOT_PATH, RULES);

    report(
        &violations,
        "Blocking I/O found on the routing hot path!",
        &[
            "❌ FORBIDDEN in history, ranking and router strategies:",
            "  - std::fs, std::net, std::process::Command",
            "  - Spawning threads",
            "✅ ACCEPTABLE:",
            "  - Configuration loading (config/)",
            "  - Test code",
        ],
    );
}

#[test]
fn test_hot_path_is_scanned() {
    let files: usize = HOT_PATH
        .iter()
        .map(|dir| architectural_enforcement::rust_sources(dir).len())
        .sum();

    // history, ranking, router/{mod, adaptive, sharded, round_robin}
    assert!(files >= 6, "only {files} hot-path files found");
}
