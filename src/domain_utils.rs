//! Domain string utilities with Public Suffix List integration.
//!
//! Policy files reference targets in many shapes: bare hosts, subdomains,
//! wildcard patterns (`*.example.com`), URLs with schemes and ports, and
//! raw IPv4 addresses. This module centralizes:
//! - Input normalization (scheme/path/port stripping, lowercasing)
//! - IPv4-literal detection, including decorated forms like
//!   `http://192.168.1.1:81`
//! - Reduction to the registrable domain using the Public Suffix List
//!   (so `sub.example.co.uk` becomes `example.co.uk`)

use std::net::Ipv4Addr;
use std::str::FromStr;

use psl::{domain_str, suffix_str};

/// Strip URL-ish decorations from a raw entry: leading scheme, trailing
/// path, port suffix and trailing dot. Returns the lowercased bare host.
fn strip_decorations(raw: &str) -> String {
    let mut s = raw.trim();
    if let Some(idx) = s.find("://") {
        s = &s[idx + 3..];
    }
    let host = s.split(['/', '?', '#']).next().unwrap_or("");
    // Port suffix: split on the last ':' only when what follows is numeric,
    // so bare hosts containing stray colons are left for validation to reject.
    let host = match host.rsplit_once(':') {
        Some((h, p)) if p.chars().all(|c| c.is_ascii_digit()) && !p.is_empty() => h,
        _ => host,
    };
    host.trim_end_matches('.').to_ascii_lowercase()
}

/// Normalize a candidate scan domain to the form the engine expects:
/// lowercase bare host, no scheme, path or port. Returns `None` for
/// entries that reduce to nothing.
pub fn normalize_host(raw: &str) -> Option<String> {
    let host = strip_decorations(raw);
    if host.is_empty() || host.contains(char::is_whitespace) {
        return None;
    }
    Some(host)
}

/// True if the entry is an IPv4 address, possibly wrapped in a scheme or
/// carrying a port (`192.168.1.1`, `192.168.1.1:81`, `http://192.168.1.1`).
/// Policy targets that are IP literals cannot expire and are skipped.
pub fn is_ipv4_literal(raw: &str) -> bool {
    Ipv4Addr::from_str(&strip_decorations(raw)).is_ok()
}

/// Reduce a policy target to its registrable domain (`sub.example.com` ->
/// `example.com`). Wildcard label prefixes (`*.example.com`) are dropped
/// first. Inputs without a recognized public suffix (e.g. `localhost`,
/// internal single-label names) are returned as-is.
pub fn registrable_domain(raw: &str) -> String {
    let mut host = strip_decorations(raw);
    while let Some(rest) = host.strip_prefix("*.") {
        host = rest.to_string();
    }
    match domain_str(&host) {
        Some(d) => d.to_string(),
        None => host,
    }
}

/// The public suffix of a target, when the PSL recognizes one. Used by the
/// classifier to pick the WHOIS registry to consult.
pub fn public_suffix(host: &str) -> Option<String> {
    let host = strip_decorations(host);
    suffix_str(&host).map(|s| s.to_string())
}
