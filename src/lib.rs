//! Resilient GraphQL subgraph client: bounded retries, escalating
//! per-attempt timeouts, failure classification, and outcome metrics.

pub mod client;
pub mod config;
pub mod metrics;
pub mod retry;
pub mod timeout;
pub mod transport;
pub mod types;

pub use client::SubgraphClient;
pub use config::SubgraphConfig;
pub use retry::{ErrorKind, QueryError, RetryPolicy};
pub use types::{SubgraphResponse, VariableValue, Variables, UNKNOWN_PROVIDER};
