//! The scanning engine: bounded-concurrency fetch -> parse -> classify
//! pipelines with cooperative cancellation.
//!
//! A `Scanner` is single-use: build it with the domain list and the two
//! lookup seams, take a [`CancelHandle`] if interruption is needed, then
//! call [`Scanner::run`]. The dispatch loop admits one pipeline per free
//! worker slot and re-checks the cancel flag before each admission;
//! in-flight pipelines always drain naturally (their own timeouts bound
//! how long that takes), so cancellation never corrupts a partially
//! folded result.
//!
//! Result folding is a single locked keyed insert per finding, so two
//! workers finishing for the same source domain (duplicate input) cannot
//! interleave partial updates.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{Notify, Semaphore};

use crate::classifier::{Classification, Classify};
use crate::domain_utils::{is_ipv4_literal, registrable_domain};
use crate::errors::{Result, ScanError};
use crate::fetcher::{FetchStatus, PolicyFetch};
use crate::policy::{self, ParseOutcome};

/// Progress/event sink injected into the engine. The engine never touches
/// a logger or the console directly; the CLI installs a styled observer,
/// tests install a recording one. All methods default to no-ops.
pub trait ScanObserver: Send + Sync {
    /// A pipeline started fetching this domain's policy.
    fn fetching(&self, _domain: &str) {}

    /// A recoverable per-domain problem (network failure, malformed
    /// policy, classification error). Never fatal to the run.
    fn warning(&self, _domain: &str, _message: &str) {}

    /// The domain's own policy carries a wildcard grant.
    fn wildcard_found(&self, _domain: &str) {}

    /// The domain's policy references an expired, re-registrable target.
    fn expired_found(&self, _domain: &str, _target: &str) {}

    /// One pipeline finished (with or without findings).
    fn domain_finished(&self, _domain: &str, _completed: usize, _total: usize) {}
}

/// Observer that swallows everything.
pub struct NullObserver;

impl ScanObserver for NullObserver {}

/// How the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    /// Every input domain was dispatched and drained.
    Completed,
    /// Cancellation stopped dispatch; the results are the consistent
    /// snapshot of the pipelines that did finish.
    Cancelled,
}

/// Internal lifecycle. `Cancelled` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// The two finding collections, append-only during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResults {
    /// Source domains whose own policy contains at least one `*` rule.
    pub wildcards: BTreeSet<String>,
    /// Source domain -> referenced domains classified expired, in
    /// classification order, deduplicated per source.
    pub expired: BTreeMap<String, Vec<String>>,
}

impl ScanResults {
    pub fn is_empty(&self) -> bool {
        self.wildcards.is_empty() && self.expired.is_empty()
    }

    fn record_wildcard(&mut self, source: &str) {
        self.wildcards.insert(source.to_string());
    }

    fn record_expired(&mut self, source: &str, target: &str) {
        let targets = self.expired.entry(source.to_string()).or_default();
        if !targets.iter().any(|t| t == target) {
            targets.push(target.to_string());
        }
    }
}

/// Final snapshot handed back to the caller.
#[derive(Debug)]
pub struct ScanReport {
    pub results: ScanResults,
    pub completion: CompletionMode,
    /// Pipelines that ran to completion (cancellation can leave this
    /// short of the input length).
    pub scanned: usize,
    pub total: usize,
}

/// Cloneable cancellation entry point, safe to trigger from a signal
/// handler task. Cancelling stops the dispatch of new domains; it never
/// kills in-flight pipelines.
#[derive(Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Single-use scanning coordinator.
pub struct Scanner {
    domains: Vec<String>,
    concurrency: usize,
    fetcher: Arc<dyn PolicyFetch>,
    classifier: Arc<dyn Classify>,
    observer: Arc<dyn ScanObserver>,
    cancel: CancelHandle,
    state: ScanState,
}

impl Scanner {
    pub fn new(
        domains: Vec<String>,
        concurrency: usize,
        fetcher: Arc<dyn PolicyFetch>,
        classifier: Arc<dyn Classify>,
        observer: Arc<dyn ScanObserver>,
    ) -> Self {
        Self {
            domains,
            concurrency,
            fetcher,
            classifier,
            observer,
            cancel: CancelHandle {
                flag: Arc::new(AtomicBool::new(false)),
                notify: Arc::new(Notify::new()),
            },
            state: ScanState::Idle,
        }
    }

    /// Handle for interrupting the run from outside (e.g. a Ctrl-C task).
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Scan every input domain, folding findings as pipelines complete.
    ///
    /// Consumes the scanner: one run per instance. Fails only on invalid
    /// inputs detected before any work is dispatched.
    pub async fn run(mut self) -> Result<ScanReport> {
        if self.concurrency == 0 {
            return Err(ScanError::configuration(
                "worker pool must hold at least one worker",
            ));
        }
        self.state = ScanState::Running;

        let total = self.domains.len();
        let results = Arc::new(Mutex::new(ScanResults::default()));
        let completed = Arc::new(AtomicUsize::new(0));
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut pipelines = FuturesUnordered::new();

        for domain in std::mem::take(&mut self.domains) {
            if self.cancel.is_cancelled() {
                break;
            }

            // Backpressure: wait for a worker slot, but wake immediately on
            // cancel instead of sitting out a full slow pipeline.
            let permit = tokio::select! {
                permit = semaphore.clone().acquire_owned() => match permit {
                    Ok(p) => p,
                    Err(_) => break,
                },
                _ = self.cancel.notify.notified() => break,
            };
            if self.cancel.is_cancelled() {
                break;
            }

            let fetcher = Arc::clone(&self.fetcher);
            let classifier = Arc::clone(&self.classifier);
            let observer = Arc::clone(&self.observer);
            let results = Arc::clone(&results);
            let completed = Arc::clone(&completed);

            pipelines.push(tokio::spawn(async move {
                scan_domain(&domain, &*fetcher, &*classifier, &*observer, &results).await;
                drop(permit);
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                observer.domain_finished(&domain, done, total);
            }));
        }

        // Drain in-flight pipelines; each is bounded by its own timeouts.
        while let Some(joined) = pipelines.next().await {
            if let Err(e) = joined {
                // A panicking pipeline is contained here: it cost us that
                // domain's findings, nothing else.
                self.observer
                    .warning("<pipeline>", &format!("worker task failed: {e}"));
            }
        }

        self.state = if self.cancel.is_cancelled() {
            ScanState::Cancelled
        } else {
            ScanState::Completed
        };

        let results = Arc::try_unwrap(results)
            .map_err(|_| ScanError::internal("result collection still shared after drain"))?
            .into_inner()
            .map_err(|_| ScanError::internal("result collection lock poisoned"))?;

        Ok(ScanReport {
            results,
            completion: match self.state {
                ScanState::Cancelled => CompletionMode::Cancelled,
                _ => CompletionMode::Completed,
            },
            scanned: completed.load(Ordering::SeqCst),
            total,
        })
    }
}

/// One domain's pipeline: fetch the policy, parse its rules, classify each
/// referenced target, fold findings. Every failure mode is absorbed here.
async fn scan_domain(
    domain: &str,
    fetcher: &dyn PolicyFetch,
    classifier: &dyn Classify,
    observer: &dyn ScanObserver,
    results: &Mutex<ScanResults>,
) {
    observer.fetching(domain);
    let doc = fetcher.fetch(domain).await;

    match doc.status {
        FetchStatus::Ok => {}
        FetchStatus::NotFound => return,
        status => {
            observer.warning(domain, &format!("could not retrieve policy: {status}"));
            return;
        }
    }

    let rules = match policy::parse(&doc) {
        ParseOutcome::Rules(rules) => rules,
        ParseOutcome::Malformed => {
            observer.warning(domain, "could not parse policy response as XML");
            return;
        }
    };

    for rule in rules {
        // IP-address targets cannot expire; skip them before any lookup.
        if !rule.is_wildcard() && is_ipv4_literal(&rule.target_pattern) {
            continue;
        }

        let target = if rule.is_wildcard() {
            rule.target_pattern.clone()
        } else {
            registrable_domain(&rule.target_pattern)
        };

        match classifier.classify(&target).await {
            Classification::Wildcard => {
                results.lock().expect("results lock").record_wildcard(domain);
                observer.wildcard_found(domain);
            }
            Classification::Expired => {
                results
                    .lock()
                    .expect("results lock")
                    .record_expired(domain, &target);
                observer.expired_found(domain, &target);
            }
            Classification::Live => {}
            Classification::Unknown => {
                observer.warning(
                    domain,
                    &format!("could not determine status of referenced domain {target}"),
                );
            }
        }
    }
}
