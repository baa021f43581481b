//! Retry with exponential backoff for onboarding API calls

use std::time::{Duration, SystemTime};

/// Retry policy for onboarding API calls
///
/// Controls how many times a failed request is retried and how
/// long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first request
    pub max_retries: u32,
    /// Base delay between retries (doubles each attempt)
    pub base_delay: Duration,
    /// Maximum delay cap
    pub max_delay: Duration,
    /// Upper bound of the random extra delay, in percent of the backoff (max 100)
    pub jitter_percent: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            jitter_percent: 25,
        }
    }
}

/// Whether a response status is worth retrying
///
/// Rate limits (429) and server errors (5xx) are transient; any other
/// 4xx means the request itself is wrong and will fail again.
#[must_use]
pub fn is_recoverable(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Whether a transport error is worth retrying
#[must_use]
pub fn is_recoverable_transport(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

/// Parse a `Retry-After` header given in whole seconds
///
/// HTTP-date values are not supported and yield `None`.
#[must_use]
pub fn parse_retry_after(value: Option<&str>) -> Option<Duration> {
    let secs = value?.trim().parse::<u64>().ok()?;
    Some(Duration::from_secs(secs))
}

/// Delay before retry number `attempt` (zero based)
///
/// Honors the server's `Retry-After` up to `max_delay`. Without one the
/// backoff doubles from `base_delay`, then gains up to `jitter_percent`
/// extra, never exceeding `max_delay`.
#[must_use]
pub fn delay_for_attempt(
    policy: &RetryPolicy,
    attempt: u32,
    retry_after: Option<Duration>,
) -> Duration {
    if let Some(wait) = retry_after {
        return wait.min(policy.max_delay);
    }

    let backoff = policy
        .base_delay
        .saturating_mul(2u32.saturating_pow(attempt))
        .min(policy.max_delay);

    backoff
        .saturating_add(jitter(backoff, policy.jitter_percent))
        .min(policy.max_delay)
}

/// Pseudo-random share of `backoff`, at most `percent` (capped at 100) of it
///
/// Seeded from the clock's sub-second nanos.
fn jitter(backoff: Duration, percent: u32) -> Duration {
    let percent = percent.min(100);
    if percent == 0 {
        return Duration::ZERO;
    }

    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();

    // per-mille steps within [0, percent]
    let steps = percent * 10 + 1;
    backoff.mul_f64(f64::from(nanos % steps) / 1000.0)
}
