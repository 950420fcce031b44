//! Query executor: drives the attempt loop around the timeout guard and the
//! transport call, classifying failures and emitting metrics.

use crate::config::SubgraphConfig;
use crate::metrics::{SUBGRAPH_ERRORS_TOTAL, SUBGRAPH_OK_TOTAL, SUBGRAPH_QUERY_DURATION_SECONDS};
use crate::retry::{classify, QueryError, RetryDecision, RetryPolicy};
use crate::timeout::with_timeout;
use crate::transport;
use crate::types::{SubgraphResponse, Variables};
use ::metrics::{counter, histogram};
use serde::de::DeserializeOwned;
use std::time::Instant;
use url::Url;
use uuid::Uuid;

/// A resilient client for one subgraph endpoint.
///
/// Attempts run strictly sequentially within a logical query; independent
/// queries may run concurrently and share only the immutable policy, the
/// underlying connection pool, and the global metrics/tracing sinks.
#[derive(Debug, Clone)]
pub struct SubgraphClient {
    url: Url,
    http: reqwest::Client,
    policy: RetryPolicy,
    user_agent: String,
}

impl SubgraphClient {
    /// Builds a client for `url` from `config`.
    pub fn new(url: Url, config: &SubgraphConfig) -> Result<Self, QueryError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self::with_http_client(url, config, http))
    }

    /// Builds a client reusing an existing connection pool.
    pub fn with_http_client(url: Url, config: &SubgraphConfig, http: reqwest::Client) -> Self {
        Self {
            url,
            http,
            policy: config.retry_policy(),
            user_agent: config.user_agent(),
        }
    }

    /// Endpoint this client talks to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Retry policy this client was built with.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs a query with the configured retry budget.
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Variables,
    ) -> Result<T, QueryError> {
        self.query_with_attempts(query, variables, self.policy.max_attempts)
            .await
    }

    /// Runs a query, overriding the retry budget for this call only. A budget
    /// of `n` allows at most `n + 1` transport calls; the configured policy
    /// is not mutated.
    pub async fn query_with_attempts<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Variables,
        max_attempts: u32,
    ) -> Result<T, QueryError> {
        let attempts_total = max_attempts.saturating_add(1);
        // One id per logical query, reused across attempts so log lines and
        // metrics can be joined.
        let query_id = Uuid::new_v4();
        let url = self.url.as_str();

        let mut attempt = 0u32;
        loop {
            let budget = self.policy.timeout_for(attempt);
            tracing::debug!(
                %query_id,
                attempt,
                attempts_total,
                timeout_ms = budget.as_millis() as u64,
                url,
                "subgraph query attempt"
            );

            let started = Instant::now();
            let outcome = with_timeout(
                |cancel| {
                    transport::post_query(
                        &self.http,
                        &self.url,
                        query,
                        &variables,
                        &self.user_agent,
                        cancel,
                    )
                },
                budget,
            )
            .await
            .and_then(|(provider, envelope)| validate_envelope(envelope, provider));
            histogram!(SUBGRAPH_QUERY_DURATION_SECONDS, "url" => url.to_string())
                .record(started.elapsed().as_secs_f64());

            let err = match outcome {
                Ok(data) => {
                    counter!(SUBGRAPH_OK_TOTAL, "url" => url.to_string()).increment(1);
                    return Ok(data);
                }
                Err(err) => err,
            };

            let kind = classify(&err);
            counter!(
                SUBGRAPH_ERRORS_TOTAL,
                "url" => url.to_string(),
                "kind" => kind.as_str()
            )
            .increment(1);
            tracing::warn!(
                %query_id,
                attempt,
                attempts_total,
                timeout_ms = budget.as_millis() as u64,
                url,
                error = %err,
                "subgraph query attempt failed"
            );

            match self.policy.decide(attempt, attempts_total, kind) {
                RetryDecision::NoRetry => return Err(err),
                RetryDecision::RetryAfter(delay) => {
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Applies the envelope success invariant: absent `errors`, present and
/// non-empty `data`. Only then is the loose JSON converted to the caller's
/// shape.
fn validate_envelope<T: DeserializeOwned>(
    envelope: SubgraphResponse<serde_json::Value>,
    provider: String,
) -> Result<T, QueryError> {
    if let Some(errors) = envelope.errors {
        return Err(QueryError::Graphql {
            message: join_error_messages(&errors.into_messages()),
            provider,
        });
    }
    let data = match envelope.data {
        Some(data) if !is_empty_data(&data) => data,
        _ => return Err(QueryError::InvalidResponse { provider }),
    };
    Ok(serde_json::from_value(data)?)
}

fn is_empty_data(data: &serde_json::Value) -> bool {
    match data {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Joins backend error messages, prefixing a count when there is more than
/// one.
fn join_error_messages(messages: &[String]) -> String {
    if messages.len() == 1 {
        format!("Errors: {}", messages[0])
    } else {
        format!("Errors ({}): {}", messages.len(), messages.join("; "))
    }
}
