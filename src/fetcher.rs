//! Policy document retrieval over HTTP(S).
//!
//! One fetch attempt per domain per run: `https://{domain}/crossdomain.xml`
//! first, falling back to plain HTTP only when the HTTPS attempt dies at the
//! connection/TLS layer (never on an HTTP-level status, so a working HTTPS
//! endpoint is never downgraded). The configured timeout is a hard upper
//! bound on the whole operation, fallback included. Network-level outcomes
//! are folded into a status code on the returned document instead of being
//! raised; a dead host must not throw the run off.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use tokio::time::timeout;

use crate::config::NetworkConfig;
use crate::errors::{Result, ScanError};

/// Well-known policy file location, relative to the host root.
pub const POLICY_FILE: &str = "crossdomain.xml";

/// Browser-like User-Agent; some hosts refuse obviously robotic clients.
const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Network-level outcome of one fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// 2xx response with a non-empty body.
    Ok,
    /// Non-2xx response, or a 2xx with an empty body (no policy present).
    NotFound,
    /// The configured deadline expired before a body was read.
    Timeout,
    /// Connect/TLS/read failure.
    ConnectionError,
}

impl std::fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FetchStatus::Ok => "ok",
            FetchStatus::NotFound => "not found",
            FetchStatus::Timeout => "timeout",
            FetchStatus::ConnectionError => "connection error",
        };
        f.write_str(s)
    }
}

/// One domain's `crossdomain.xml` as fetched. Transient: produced per
/// attempt, consumed immediately by the parser.
#[derive(Debug, Clone)]
pub struct PolicyDocument {
    pub domain: String,
    pub status: FetchStatus,
    pub body: String,
}

impl PolicyDocument {
    /// A bodyless document carrying only a failure status.
    pub fn empty(domain: &str, status: FetchStatus) -> Self {
        Self {
            domain: domain.to_string(),
            status,
            body: String::new(),
        }
    }
}

/// Retrieval seam. The scanner only sees this trait, so tests substitute
/// canned documents for live HTTP.
#[async_trait]
pub trait PolicyFetch: Send + Sync {
    async fn fetch(&self, domain: &str) -> PolicyDocument;
}

/// Production fetcher backed by a shared `reqwest` client.
pub struct HttpPolicyFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpPolicyFetcher {
    pub fn new(network: &NetworkConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
        let client = reqwest::Client::builder()
            .timeout(network.http_timeout)
            .redirect(reqwest::redirect::Policy::limited(3))
            .default_headers(headers)
            .build()
            .map_err(|e| ScanError::network("HTTP client construction", POLICY_FILE, e))?;
        Ok(Self {
            client,
            timeout: network.http_timeout,
        })
    }

    async fn attempt(
        &self,
        domain: &str,
        scheme: &str,
    ) -> std::result::Result<PolicyDocument, reqwest::Error> {
        let url = format!("{scheme}://{domain}/{POLICY_FILE}");
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Ok(PolicyDocument::empty(domain, FetchStatus::NotFound));
        }
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(PolicyDocument::empty(domain, FetchStatus::NotFound));
        }
        Ok(PolicyDocument {
            domain: domain.to_string(),
            status: FetchStatus::Ok,
            body,
        })
    }
}

#[async_trait]
impl PolicyFetch for HttpPolicyFetcher {
    async fn fetch(&self, domain: &str) -> PolicyDocument {
        let attempts = async {
            match self.attempt(domain, "https").await {
                Ok(doc) => doc,
                Err(e) if e.is_timeout() => PolicyDocument::empty(domain, FetchStatus::Timeout),
                // Died before any response arrived: one retry over plain HTTP.
                Err(e) if e.is_connect() => match self.attempt(domain, "http").await {
                    Ok(doc) => doc,
                    Err(e2) if e2.is_timeout() => {
                        PolicyDocument::empty(domain, FetchStatus::Timeout)
                    }
                    Err(_) => PolicyDocument::empty(domain, FetchStatus::ConnectionError),
                },
                Err(_) => PolicyDocument::empty(domain, FetchStatus::ConnectionError),
            }
        };
        // The per-request client timeout bounds each attempt; this outer
        // deadline bounds the pair so fallback cannot double the wait.
        match timeout(self.timeout, attempts).await {
            Ok(doc) => doc,
            Err(_) => PolicyDocument::empty(domain, FetchStatus::Timeout),
        }
    }
}
