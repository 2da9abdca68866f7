//! Findings report generation.
//!
//! The persisted artifact is a line-oriented file consumed by downstream
//! tooling, so its shape is fixed:
//!
//! ```text
//! bad.com,wildcard,*
//! risky.com,expired,abandoned-co.net, stale.example
//! ```
//!
//! A run with no findings at all writes the literal token `NA` as the
//! file's sole content. Wildcard lines come first, then expired lines;
//! within a line the expired targets keep their classification order.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::errors::{IoResultExt, Result};
use crate::scanner::ScanResults;

/// Token written when a scan produced no findings.
pub const EMPTY_REPORT: &str = "NA";

/// Render the report lines for a result set. Deterministic for a given
/// set of findings: sources are emitted in lexical order.
pub fn report_lines(results: &ScanResults) -> Vec<String> {
    let mut lines = Vec::new();
    for domain in &results.wildcards {
        lines.push(format!("{domain},wildcard,*"));
    }
    for (domain, targets) in &results.expired {
        lines.push(format!("{domain},expired,{}", targets.join(", ")));
    }
    lines
}

/// Write the findings file at `path`, creating or truncating it.
pub fn write_report(path: &Path, results: &ScanResults) -> Result<()> {
    let display = path.display().to_string();
    let mut file = File::create(path).with_path(&display, "create")?;
    if results.is_empty() {
        file.write_all(EMPTY_REPORT.as_bytes())
            .with_path(&display, "write")?;
        return Ok(());
    }
    for line in report_lines(results) {
        writeln!(file, "{line}").with_path(&display, "write")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};

    fn sample_results() -> ScanResults {
        let mut wildcards = BTreeSet::new();
        wildcards.insert("bad.com".to_string());
        let mut expired = BTreeMap::new();
        expired.insert(
            "risky.com".to_string(),
            vec!["abandoned-co.net".to_string(), "stale.example".to_string()],
        );
        ScanResults { wildcards, expired }
    }

    #[test]
    fn line_format_matches_consumers() {
        let lines = report_lines(&sample_results());
        assert_eq!(
            lines,
            vec![
                "bad.com,wildcard,*".to_string(),
                "risky.com,expired,abandoned-co.net, stale.example".to_string(),
            ]
        );
    }

    #[test]
    fn wildcard_lines_precede_expired_lines() {
        let mut results = sample_results();
        results.wildcards.insert("zzz.com".to_string());
        let lines = report_lines(&results);
        assert!(lines[0].contains(",wildcard,"));
        assert!(lines[1].contains(",wildcard,"));
        assert!(lines[2].contains(",expired,"));
    }

    #[test]
    fn writes_findings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");
        write_report(&path, &sample_results()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "bad.com,wildcard,*\nrisky.com,expired,abandoned-co.net, stale.example\n"
        );
    }

    #[test]
    fn empty_results_write_the_na_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");
        write_report(&path, &ScanResults::default()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "NA");
    }
}
