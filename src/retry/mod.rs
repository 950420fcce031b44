//! Retry and backoff policy.
//!
//! This module encapsulates error classification (timeouts, HTTP failures,
//! backend-reported GraphQL errors, malformed queries) and the fixed-backoff
//! retry decisions so the query executor can stay a plain loop.

mod classify;
mod error;
mod policy;

pub use classify::{classify, classify_message};
pub use error::QueryError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
