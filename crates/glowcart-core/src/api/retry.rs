use std::time::Duration;

use super::ApiError;

/// Retries after the first attempt before a failure is surfaced.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base backoff delay in milliseconds. Retry `n` waits `n` times this.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Linear backoff policy shared by every request a client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }

    /// Delay before the given retry (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.retry_delay.saturating_mul(retry)
    }
}

/// Where a single logical request is in its retry sequence.
///
/// Each failed attempt produces a new context through [`RetryContext::next`];
/// the request configuration itself is never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryContext {
    /// Retries already performed (0 on the first attempt).
    pub retries: u32,
    /// Total backoff slept so far.
    pub waited: Duration,
}

impl RetryContext {
    /// 1-based number of the attempt this context describes.
    pub fn attempt(&self) -> u32 {
        self.retries + 1
    }

    /// Decide whether `error` earns another attempt, returning the context
    /// for that attempt and how long to wait before it.
    pub fn next(&self, policy: &RetryPolicy, error: &ApiError) -> Option<(RetryContext, Duration)> {
        if !error.is_retryable() || self.retries >= policy.max_retries {
            return None;
        }
        let retries = self.retries + 1;
        let delay = policy.delay_for(retries);
        Some((
            RetryContext {
                retries,
                waited: self.waited + delay,
            },
            delay,
        ))
    }
}
