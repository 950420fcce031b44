//! Query attempt error type for retry classification.

use std::time::Duration;
use thiserror::Error;

/// Error produced by a single query attempt (timeout, HTTP error,
/// backend-reported errors, or transport failure). Classified by
/// [`classify`](super::classify) before deciding whether to retry; the last
/// attempt's error reaches the caller unchanged.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The attempt exceeded its timeout budget.
    #[error("query timed out after {budget:?}")]
    Timeout { budget: Duration },
    /// The attempt's cancellation token fired mid-exchange.
    #[error("query cancelled")]
    Cancelled,
    /// HTTP response had a non-2xx status.
    #[error("Invalid request. Status: {status}. Provider: {provider}.")]
    Http { status: u16, provider: String },
    /// The backend answered 2xx but the envelope reported errors.
    #[error("GraphQL Error: Invalid response. {message}. Provider: {provider}")]
    Graphql { message: String, provider: String },
    /// 2xx with no reported errors but absent or empty data.
    #[error("GraphQL Error: Invalid response. Provider: {provider}")]
    InvalidResponse { provider: String },
    /// Transport-level failure (connect, DNS, body read, JSON decode).
    #[error(transparent)]
    Network(#[from] reqwest::Error),
    /// The envelope decoded but `data` did not match the requested shape.
    #[error("failed to decode response data: {0}")]
    Decode(#[from] serde_json::Error),
}
