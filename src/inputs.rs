//! Domain list loading.
//!
//! Candidate domains come from three places: direct CLI arguments, plain
//! line-per-domain files, and Alexa-style ranking CSVs (`rank,domain`).
//! Everything is normalized to the bare-host form the engine expects;
//! entries that reduce to nothing are dropped and reported to the caller
//! so a typo in an input file is visible rather than silently skipped.

use std::fs;
use std::path::Path;

use crate::cli::Cli;
use crate::domain_utils::normalize_host;
use crate::errors::{IoResultExt, Result};

/// Read a plain input file: one domain per line, blank lines ignored.
pub fn read_domain_file(path: &Path) -> Result<Vec<String>> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).with_path(&display, "read")?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Read an Alexa-formatted csv file: `rank,domain` per line.
pub fn read_alexa_file(path: &Path) -> Result<Vec<String>> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).with_path(&display, "read")?;
    Ok(content
        .lines()
        .filter_map(|line| line.split(',').nth(1))
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(String::from)
        .collect())
}

/// Collect the full candidate list from every CLI source, normalized.
/// Returns the list plus the raw entries that failed normalization.
pub fn gather_domains(cli: &Cli) -> Result<(Vec<String>, Vec<String>)> {
    let mut raw: Vec<String> = Vec::new();

    for path in &cli.alexa {
        raw.extend(read_alexa_file(path)?);
    }
    raw.extend(cli.domains.iter().cloned());
    if let Some(ref path) = cli.input {
        raw.extend(read_domain_file(path)?);
    }

    let mut domains = Vec::new();
    let mut rejected = Vec::new();
    for entry in raw {
        match normalize_host(&entry) {
            Some(host) => domains.push(host),
            None => rejected.push(entry),
        }
    }
    Ok((domains, rejected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn reads_plain_domain_files() {
        let f = file_with("example.com\n\n  example.org  \n");
        let domains = read_domain_file(f.path()).unwrap();
        assert_eq!(domains, vec!["example.com", "example.org"]);
    }

    #[test]
    fn reads_alexa_csv_files() {
        let f = file_with("1,google.com\n2,youtube.com\nmalformed-line\n");
        let domains = read_alexa_file(f.path()).unwrap();
        assert_eq!(domains, vec!["google.com", "youtube.com"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_domain_file(Path::new("/nonexistent/domains.txt")).is_err());
    }

    #[test]
    fn gathers_and_normalizes_all_sources() {
        let input = file_with("HTTPS://Example.NET/\n???\n");
        let cli = Cli::parse_from([
            "xdscan",
            "--domains",
            "Example.COM",
            "-i",
            input.path().to_str().unwrap(),
        ]);
        let (domains, rejected) = gather_domains(&cli).unwrap();
        assert_eq!(domains, vec!["example.com", "example.net"]);
        assert_eq!(rejected, vec!["???"]);
    }
}
