//! Retry policy with exponential backoff, and the retrying transport that applies it.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::http_client::{HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse};

/// Backoff strategy for retrying failed requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Uses a fixed delay between retries.
    Fixed {
        /// Delay between retries.
        delay: Duration,
    },
    /// Uses an exponential delay between retries.
    ///
    /// The delay is calculated as `base * (factor ^ attempt)`.
    Exponential {
        /// The initial backoff duration.
        base: Duration,
        /// The multiplicative factor for each subsequent retry.
        factor: f64,
        /// The maximum duration to wait between retries.
        max: Duration,
        /// Whether to apply random jitter (+/- 50%) to the delay.
        jitter: bool,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(300),
            factor: 2.0,
            max: Duration::from_secs(120),
            jitter: false,
        }
    }
}

impl Backoff {
    /// Calculate the delay before retry number `attempt` (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let scale = factor.powi(attempt as i32);
                let nanos = base.as_nanos() as f64 * scale;
                let capped_nanos = nanos.min(max.as_nanos() as f64);

                let mut delay = Duration::from_nanos(capped_nanos.round() as u64);

                // Apply jitter: +/- 50% of the delay
                if jitter {
                    let jitter_ms = (delay.as_millis() as f64 * 0.5) as u64;
                    let random_offset = fastrand::u64(0..=(jitter_ms * 2));
                    let total_ms =
                        delay.as_millis() as i64 + (random_offset as i64 - jitter_ms as i64);
                    delay = Duration::from_millis(total_ms.max(0) as u64);
                }

                delay
            }
        }
    }
}

/// Retry configuration attached to the shared outbound client.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per exchange, the first call included. Values below 1
    /// behave as 1.
    pub max_attempts: u32,
    /// The backoff strategy to use between retries.
    pub backoff: Backoff,
    /// HTTP status codes that trigger a retry.
    pub retry_on_status: Vec<u16>,
    /// Whether to retry on request timeouts.
    pub retry_on_timeout: bool,
    /// Whether to retry on connection errors.
    pub retry_on_connect: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            backoff: Backoff::default(),
            retry_on_status: vec![500, 502, 503, 504],
            retry_on_timeout: true,
            retry_on_connect: true,
        }
    }
}

impl RetryPolicy {
    /// Default policy with `max_retries` retries after the first attempt.
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_attempts: max_retries.saturating_add(1),
            ..Self::default()
        }
    }

    /// Fixed backoff between retries.
    pub fn fixed(delay: Duration, max_retries: u32) -> Self {
        Self {
            backoff: Backoff::Fixed { delay },
            ..Self::with_max_retries(max_retries)
        }
    }

    /// A single attempt, never retried.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Check if a given HTTP status code should trigger a retry.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status.contains(&status)
    }

    /// Check if a transport error should trigger a retry.
    pub fn should_retry_error(&self, error: &HttpError) -> bool {
        match error.kind() {
            HttpErrorKind::Timeout => self.retry_on_timeout,
            HttpErrorKind::Connect => self.retry_on_connect,
            HttpErrorKind::Request | HttpErrorKind::Body => false,
        }
    }

    /// Calculate the delay before retry number `attempt` (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

/// Transport decorator that replays retryable exchanges according to a
/// [`RetryPolicy`].
///
/// Once attempts are exhausted the last outcome is returned unchanged, so a
/// final 503 still reaches the adapter as a non-success response.
#[derive(Clone)]
pub struct RetryingHttpClient {
    inner: Arc<dyn HttpClient>,
    policy: RetryPolicy,
}

impl RetryingHttpClient {
    pub fn new(inner: Arc<dyn HttpClient>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    fn should_retry(&self, outcome: &Result<HttpResponse, HttpError>) -> bool {
        match outcome {
            Ok(response) => self.policy.should_retry_status(response.status),
            Err(error) => self.policy.should_retry_error(error),
        }
    }
}

impl HttpClient for RetryingHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let max_attempts = self.policy.max_attempts.max(1);
            let mut attempt = 1;

            loop {
                let outcome = self.inner.execute(request.clone()).await;
                if attempt >= max_attempts || !self.should_retry(&outcome) {
                    return outcome;
                }

                let delay = self.policy.delay_for_attempt(attempt - 1);
                match &outcome {
                    Ok(response) => tracing::debug!(
                        url = %request.url,
                        status = response.status,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "retrying after retryable status"
                    ),
                    Err(error) => tracing::debug!(
                        url = %request.url,
                        error = %error,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "retrying after transport error"
                    ),
                }

                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        })
    }
}
