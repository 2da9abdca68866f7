//! Raw WHOIS lookups for domain registration status.
//!
//! The classifier needs one answer from WHOIS: is this domain currently
//! registered, or is it available for re-registration? The flow is the
//! canonical two-step: ask `whois.iana.org` which registry serves the TLD
//! (the `refer:` line), then query that registry and match its response
//! against the well-known availability phrases. Registries disagree on
//! wording, so interpretation is phrase-list based and deliberately
//! conservative: a response matching neither direction is `Err`, never a
//! guess.

use std::time::Duration;

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// WHOIS TCP port.
const WHOIS_PORT: u16 = 43;

/// IANA root database; knows the registry WHOIS server for every TLD.
const IANA_WHOIS: &str = "whois.iana.org";

/// "refer: whois.verisign-grs.com" in an IANA (or registry) response.
static RE_REFER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*(?:refer|whois):\s*([A-Z0-9._\-]+)\s*$").unwrap());

/// Phrases registries use for an unregistered / available domain.
const AVAILABLE_PHRASES: [&str; 8] = [
    "no match for",
    "no match!!",
    "not found",
    "no entries found",
    "no data found",
    "no object found",
    "domain not found",
    "is available for registration",
];

/// Phrases that positively indicate a registration record.
const REGISTERED_PHRASES: [&str; 5] = [
    "domain name:",
    "domain:",
    "registrar:",
    "creation date:",
    "registered on:",
];

/// Registration status of a domain per its TLD registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStatus {
    Registered,
    /// Unregistered or expired: re-registrable by anyone.
    Available,
}

/// Perform a basic WHOIS query (over TCP 43) with a timeout.
///
/// Returns the raw textual response.
pub async fn simple_whois(server: &str, query: &str, to: Duration) -> Result<String> {
    // Connect with timeout
    let mut stream = match timeout(to, TcpStream::connect((server, WHOIS_PORT))).await {
        Ok(Ok(s)) => s,
        Ok(Err(e)) => return Err(anyhow!("connect error to {server}: {e}")),
        Err(_) => return Err(anyhow!("connect timeout to {server}")),
    };

    // Send query (canonical WHOIS: "<query>\r\n")
    let line = format!("{query}\r\n");
    timeout(to, stream.write_all(line.as_bytes()))
        .await
        .map_err(|_| anyhow!("write timeout to {server}"))??;

    // Read whole response
    let mut buf = Vec::new();
    timeout(to, stream.read_to_end(&mut buf))
        .await
        .map_err(|_| anyhow!("read timeout from {server}"))??;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Ask IANA which WHOIS server is authoritative for `suffix` (a TLD or
/// public suffix; for multi-label suffixes the final label is what IANA
/// indexes).
pub async fn registry_server_for(suffix: &str, to: Duration) -> Result<String> {
    let tld = suffix.rsplit('.').next().unwrap_or(suffix);
    let resp = simple_whois(IANA_WHOIS, tld, to).await?;
    extract_referral(&resp).ok_or_else(|| anyhow!("no registry referral for .{tld}"))
}

/// Decide registration status from a raw registry response.
///
/// Errs when the response matches neither phrase list; callers treat that
/// as "unknown", not as evidence in either direction.
pub fn interpret_response(resp: &str) -> Result<RegistrationStatus> {
    let lowered = resp.to_lowercase();
    if AVAILABLE_PHRASES.iter().any(|p| lowered.contains(p)) {
        return Ok(RegistrationStatus::Available);
    }
    if REGISTERED_PHRASES.iter().any(|p| lowered.contains(p)) {
        return Ok(RegistrationStatus::Registered);
    }
    Err(anyhow!("unrecognized whois response"))
}

/// Full registration lookup: IANA referral, registry query, interpretation.
///
/// `to` bounds each network step individually; the classifier wraps the
/// whole call in its own overall deadline.
pub async fn registration_status(
    domain: &str,
    suffix: &str,
    to: Duration,
) -> Result<RegistrationStatus> {
    let server = registry_server_for(suffix, to).await?;
    let resp = simple_whois(&server, domain, to).await?;
    if resp.trim().is_empty() {
        return Err(anyhow!("empty whois response from {server}"));
    }
    interpret_response(&resp)
}

fn extract_referral(resp: &str) -> Option<String> {
    RE_REFER
        .captures(resp)
        .and_then(|c| c.get(1).map(|m| m.as_str().to_ascii_lowercase()))
}
