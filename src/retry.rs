//! Retry utilities for WHOIS lookups with exponential backoff.
//!
//! Registry WHOIS servers rate-limit aggressively and drop connections
//! under load; a single retry recovers most transient failures. DNS and
//! HTTP deliberately get no retries; the fetcher's contract is one
//! deterministic attempt per domain per run.

use std::time::Duration;

use tokio::time::sleep;

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not including the initial attempt)
    pub max_attempts: u32,

    /// Initial delay between retries
    pub initial_delay: Duration,

    /// Maximum delay between retries (for exponential backoff)
    pub max_delay: Duration,

    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,

    /// Whether to add jitter to prevent thundering herd
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

/// Policy for determining if an operation should be retried
pub trait RetryPolicy<E> {
    /// Returns true if the operation should be retried for this error
    fn should_retry(&self, error: &E, attempt: u32) -> bool;
}

/// WHOIS-specific retry policy
pub struct WhoisRetryPolicy;

impl<E> RetryPolicy<E> for WhoisRetryPolicy
where
    E: std::fmt::Display,
{
    fn should_retry(&self, error: &E, attempt: u32) -> bool {
        if attempt >= 2 {
            return false;
        }

        let error_str = error.to_string().to_lowercase();

        // WHOIS servers often have rate limiting or temporary unavailability
        error_str.contains("timeout")
            || error_str.contains("connection")
            || error_str.contains("rate limit")
            || error_str.contains("quota")
            || error_str.contains("temporarily unavailable")
            || error_str.contains("try again")
    }
}

/// Retry executor that handles the retry logic
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    /// Create a new retry executor with the given configuration
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Execute an async operation with retry logic
    pub async fn execute<F, Fut, T, E, P>(&self, operation: F, policy: P) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        P: RetryPolicy<E>,
    {
        let mut delay = self.config.initial_delay;

        for attempt in 0.. {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    if attempt >= self.config.max_attempts || !policy.should_retry(&error, attempt)
                    {
                        return Err(error);
                    }

                    let actual_delay = if self.config.jitter {
                        add_jitter(delay)
                    } else {
                        delay
                    };
                    sleep(actual_delay).await;

                    delay = std::cmp::min(
                        Duration::from_millis(
                            (delay.as_millis() as f64 * self.config.backoff_multiplier) as u64,
                        ),
                        self.config.max_delay,
                    );
                }
            }
        }

        unreachable!("retry loop returns from within")
    }
}

/// Add random jitter to prevent thundering herd problems
fn add_jitter(delay: Duration) -> Duration {
    use rand::Rng;

    let jitter_range = delay.as_millis() as f64 * 0.1; // 10% jitter
    let mut rng = rand::rng();
    let jitter: f64 = rng.random_range(-jitter_range..=jitter_range);

    let jittered_ms = (delay.as_millis() as f64 + jitter).max(0.0) as u64;
    Duration::from_millis(jittered_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn retries_transient_whois_failures_once() {
        let calls = AtomicU32::new(0);
        let executor = RetryExecutor::new(RetryConfig {
            jitter: false,
            initial_delay: Duration::from_millis(1),
            ..RetryConfig::default()
        });

        let result: Result<u32, String> = executor
            .execute(
                || {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if n == 0 {
                            Err("connect timeout to whois.example".to_string())
                        } else {
                            Ok(7)
                        }
                    }
                },
                WhoisRetryPolicy,
            )
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn permanent_failures_are_not_retried() {
        let calls = AtomicU32::new(0);
        let executor = RetryExecutor::new(RetryConfig {
            jitter: false,
            initial_delay: Duration::from_millis(1),
            ..RetryConfig::default()
        });

        let result: Result<u32, String> = executor
            .execute(
                || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err("unrecognized whois response".to_string()) }
                },
                WhoisRetryPolicy,
            )
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
