use std::time::Duration;

/// High-level classification of a failed attempt for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network-level failure (connect, DNS, reset).
    Network,
    /// Non-2xx HTTP status.
    Http,
    /// Backend answered but the envelope reported errors or empty data.
    Graphql,
    /// The attempt exceeded its timeout budget.
    Timeout,
    /// The backend rejected the query text itself. Never retried.
    MalformedQuery,
    /// Anything not otherwise recognized.
    Unknown,
}

impl ErrorKind {
    /// Label value used on the error counter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::Http => "http",
            ErrorKind::Graphql => "graphql",
            ErrorKind::Timeout => "timeout",
            ErrorKind::MalformedQuery => "malformed_query",
            ErrorKind::Unknown => "unknown",
        }
    }

    /// Whether another attempt can ever help. A malformed query fails the
    /// same way no matter how often it is sent.
    pub fn retryable(&self) -> bool {
        !matches!(self, ErrorKind::MalformedQuery)
    }
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Fixed-backoff retry policy with an escalating per-attempt timeout.
///
/// Built once per client from [`SubgraphConfig`](crate::config::SubgraphConfig)
/// and immutable thereafter. The backoff is deliberately flat rather than
/// exponential: escalation already happens through the growing timeout budget.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt. A logical query makes at most
    /// `max_attempts + 1` transport calls.
    pub max_attempts: u32,
    /// Timeout budget for the first attempt.
    pub base_timeout: Duration,
    /// Extra budget granted to each subsequent attempt.
    pub timeout_increment: Duration,
    /// Fixed pause between a failed attempt and the next one.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_timeout: Duration::from_secs(10),
            timeout_increment: Duration::from_secs(10),
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Timeout budget for a 0-based attempt index:
    /// `base_timeout + attempt * timeout_increment`. Later attempts get more
    /// room on the hypothesis that earlier ones timed out under load.
    pub fn timeout_for(&self, attempt: u32) -> Duration {
        self.base_timeout
            .saturating_add(self.timeout_increment.saturating_mul(attempt))
    }

    /// Decide whether to run another attempt. `attempt` is the 0-based index
    /// of the attempt that just failed; `attempts_total` is the budget for
    /// this call (callers may override the configured budget per call).
    pub fn decide(&self, attempt: u32, attempts_total: u32, kind: ErrorKind) -> RetryDecision {
        if !kind.retryable() {
            return RetryDecision::NoRetry;
        }
        if attempt.saturating_add(1) >= attempts_total {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.backoff)
    }
}
