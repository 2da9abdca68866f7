//! Liveness classification of policy-referenced domains.
//!
//! A referenced target is a takeover risk only when its domain is no longer
//! registered. Evidence is gathered in two steps:
//!
//! 1. DNS A/AAAA lookup. Resolution is conclusive in one direction only:
//!    a resolving domain is certainly registered (`Live`). NXDOMAIN is
//!    merely suggestive; parked and recently-lapsed domains often stop
//!    resolving long before the registration drops.
//! 2. WHOIS confirmation. Only an explicit availability phrase from the
//!    TLD registry classifies the domain `Expired`.
//!
//! Any timeout or error along the way yields `Unknown`, which is terminal
//! and never becomes a finding; absence of evidence is not evidence of
//! takeover risk.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use trust_dns_resolver::{
    config::{ResolverConfig, ResolverOpts},
    TokioAsyncResolver,
};

use crate::config::NetworkConfig;
use crate::domain_utils::{public_suffix, registrable_domain};
use crate::policy::WILDCARD;
use crate::retry::{RetryConfig, RetryExecutor, WhoisRetryPolicy};
use crate::whois::{registration_status, RegistrationStatus};

/// Terminal outcome for one trust-rule target. `Wildcard` and the
/// liveness states are mutually exclusive per target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The literal `*` token: unrestricted trust.
    Wildcard,
    /// The referenced domain is registered.
    Live,
    /// The referenced domain is unregistered and re-registrable.
    Expired,
    /// The check itself failed or timed out; no conclusion either way.
    Unknown,
}

/// Classification seam. The scanner only sees this trait, so tests
/// substitute table-driven verdicts for live lookups.
#[async_trait]
pub trait Classify: Send + Sync {
    async fn classify(&self, target_pattern: &str) -> Classification;
}

/// Production classifier: shared resolver plus WHOIS confirmation.
pub struct LivenessClassifier {
    resolver: TokioAsyncResolver,
    dns_timeout: Duration,
    whois_timeout: Duration,
    whois_attempts: u32,
    retry: RetryExecutor,
}

impl LivenessClassifier {
    pub fn new(network: &NetworkConfig) -> Self {
        let resolver =
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());
        Self {
            resolver,
            dns_timeout: network.dns_timeout,
            whois_timeout: network.whois_timeout,
            whois_attempts: 1 + network.whois_retry_attempts,
            retry: RetryExecutor::new(RetryConfig {
                max_attempts: network.whois_retry_attempts,
                ..RetryConfig::default()
            }),
        }
    }

    /// True when the domain currently resolves to at least one address.
    async fn resolves(&self, domain: &str) -> bool {
        match timeout(self.dns_timeout, self.resolver.lookup_ip(domain)).await {
            Ok(Ok(lookup)) => lookup.iter().next().is_some(),
            _ => false,
        }
    }

    /// WHOIS steps per attempt: one IANA referral plus one registry query.
    fn whois_steps_per_attempt(&self) -> u32 {
        2
    }
}

#[async_trait]
impl Classify for LivenessClassifier {
    async fn classify(&self, target_pattern: &str) -> Classification {
        if target_pattern == WILDCARD {
            return Classification::Wildcard;
        }

        let domain = registrable_domain(target_pattern);
        if !domain.contains('.') {
            // Single-label / internal names have no registry to consult.
            return Classification::Unknown;
        }
        let suffix = public_suffix(&domain)
            .unwrap_or_else(|| domain.rsplit('.').next().unwrap_or(&domain).to_string());

        if self.resolves(&domain).await {
            return Classification::Live;
        }

        // Does not resolve: ask the registry whether it is actually gone.
        // Each WHOIS step is individually bounded; this deadline caps the
        // whole confirmation including the retry.
        let overall = self.whois_timeout * (self.whois_attempts * self.whois_steps_per_attempt());
        let lookup = self.retry.execute(
            || registration_status(&domain, &suffix, self.whois_timeout),
            WhoisRetryPolicy,
        );
        match timeout(overall, lookup).await {
            Ok(Ok(RegistrationStatus::Available)) => Classification::Expired,
            Ok(Ok(RegistrationStatus::Registered)) => Classification::Live,
            Ok(Err(_)) | Err(_) => Classification::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn wildcard_short_circuits_without_lookups() {
        let classifier = LivenessClassifier::new(&NetworkConfig::default());
        assert_eq!(classifier.classify("*").await, Classification::Wildcard);
    }

    #[tokio::test]
    async fn single_label_names_are_unknown() {
        let classifier = LivenessClassifier::new(&NetworkConfig {
            dns_timeout: Duration::from_millis(200),
            whois_timeout: Duration::from_millis(200),
            ..NetworkConfig::default()
        });
        assert_eq!(
            classifier.classify("intranet-host").await,
            Classification::Unknown
        );
    }
}
