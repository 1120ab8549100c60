//! Architectural Enforcement
//!
//! Source scanners backing the integration tests in `tests/`:
//! - No sleep calls in router or simulator production code
//! - No blocking I/O on the selection and feedback paths
//!
//! Production code is everything in a file before its `#[cfg(test)]`
//! module. Line comments are ignored.

use std::fs;
use std::path::{Path, PathBuf};

/// A forbidden pattern found in production code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File the pattern was found in
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// Which rule matched
    pub rule: &'static str,
    /// The offending line, trimmed
    pub text: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} - {}: {}",
            self.path.display(),
            self.line,
            self.rule,
            self.text
        )
    }
}

/// A named set of substrings that must not appear in production code
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Reported with each violation
    pub name: &'static str,
    /// Any of these substrings triggers the rule
    pub patterns: &'static [&'static str],
}

/// Workspace root, resolved from this crate's manifest directory
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .canonicalize()
        .unwrap_or_else(|_| PathBuf::from("../.."))
}

/// All `.rs` files under `dir` (relative to the workspace root)
#[must_use]
pub fn rust_sources(dir: &str) -> Vec<PathBuf> {
    let root = workspace_root().join(dir);
    if !root.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// Lines of `content` that belong to production code, with their 1-based numbers
///
/// Stops at the first `#[cfg(test)]`; strips `//` comments.
#[must_use]
pub fn production_lines(content: &str) -> Vec<(usize, &str)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| line.trim() != "#[cfg(test)]")
        .map(|(idx, line)| (idx + 1, line.split("//").next().unwrap_or(line)))
        .filter(|(_, code)| !code.trim().is_empty())
        .collect()
}

/// Check `content` against `rules`
#[must_use]
pub fn scan_source(path: &Path, content: &str, rules: &[Rule]) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (line, code) in production_lines(content) {
        for rule in rules {
            if rule.patterns.iter().any(|p| code.contains(p)) {
                violations.push(Violation {
                    path: path.to_path_buf(),
                    line,
                    rule: rule.name,
                    text: code.trim().to_string(),
                });
            }
        }
    }
    violations
}

/// Check every production source file under `dirs`
#[must_use]
pub fn scan_dirs(dirs: &[&str], rules: &[Rule]) -> Vec<Violation> {
    dirs.iter()
        .flat_map(|dir| rust_sources(dir))
        .filter_map(|path| {
            let content = fs::read_to_string(&path).ok()?;
            Some(scan_source(&path, &content, rules))
        })
        .flatten()
        .collect()
}

/// Print violations and fail the calling test if there are any
pub fn report(violations: &[Violation], headline: &str, advice: &[&str]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ CRITICAL: {headline}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    eprintln!();
    for line in advice {
        eprintln!("  {line}");
    }

    panic!(
        "\nFound {} violation(s) in production code.\nFix these before merging!",
        violations.len()
    );
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SLEEP: Rule = Rule {
        name: "Sleep call",
        patterns: &["sleep("],
    };

    #[test]
    fn test_scan_ignores_comments_and_tests() {
        let source = "\
fn hot() {
    // thread::sleep(d) would stall readers
    let x = 1;
}

#[cfg(test)]
mod tests {
    fn slow() { std::thread::sleep(d); }
}
";
        assert!(scan_source(Path::new("a.rs"), source, &[SLEEP]).is_empty());
    }

    #[test]
    fn test_scan_reports_line() {
        let source = "fn a() {}\nfn b() { tokio::time::sleep(d).await; }\n";
        let violations = scan_source(Path::new("a.rs"), source, &[SLEEP]);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 2);
        assert_eq!(violations[0].rule, "Sleep call");
    }

    #[test]
    fn test_workspace_root_has_router() {
        assert!(workspace_root().join("router/core/src/lib.rs").exists());
        assert!(!rust_sources("router/core/src").is_empty());
    }
}
