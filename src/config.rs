//! Client configuration: toml-deserializable, env-overridable, with
//! documented defaults for every knob.

use crate::retry::RetryPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Configuration for a [`SubgraphClient`](crate::client::SubgraphClient).
///
/// Every field has a default, so a partial toml section (or an empty
/// environment) yields a working client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubgraphConfig {
    /// Retries after the first attempt; a query makes at most
    /// `retries + 1` transport calls. Default 3.
    pub retries: u32,
    /// Timeout budget for the first attempt, in milliseconds. Default 10000.
    pub query_timeout_ms: u64,
    /// Extra timeout granted to each subsequent attempt, in milliseconds.
    /// Default 10000.
    pub timeout_increment_ms: u64,
    /// Fixed pause between attempts, in milliseconds. Default 500.
    pub backoff_ms: u64,
    /// Identity advertised in the User-Agent header. Default none
    /// ("Unknown sender").
    pub agent_name: Option<String>,
}

impl Default for SubgraphConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            query_timeout_ms: 10_000,
            timeout_increment_ms: 10_000,
            backoff_ms: 500,
            agent_name: None,
        }
    }
}

impl SubgraphConfig {
    /// Reads configuration from the process environment using the
    /// component's historical keys: `SUBGRAPH_COMPONENT_RETRIES`,
    /// `SUBGRAPH_COMPONENT_QUERY_TIMEOUT`,
    /// `SUBGRAPH_COMPONENT_TIMEOUT_INCREMENT`, `SUBGRAPH_COMPONENT_BACKOFF`
    /// (all numeric, milliseconds where applicable) and
    /// `SUBGRAPH_COMPONENT_AGENT_NAME`. Missing keys fall back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but reading from an arbitrary
    /// key-value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            retries: parse_or(&lookup, "SUBGRAPH_COMPONENT_RETRIES", defaults.retries)?,
            query_timeout_ms: parse_or(
                &lookup,
                "SUBGRAPH_COMPONENT_QUERY_TIMEOUT",
                defaults.query_timeout_ms,
            )?,
            timeout_increment_ms: parse_or(
                &lookup,
                "SUBGRAPH_COMPONENT_TIMEOUT_INCREMENT",
                defaults.timeout_increment_ms,
            )?,
            backoff_ms: parse_or(&lookup, "SUBGRAPH_COMPONENT_BACKOFF", defaults.backoff_ms)?,
            agent_name: lookup("SUBGRAPH_COMPONENT_AGENT_NAME"),
        })
    }

    /// User-Agent header value sent with every request.
    pub fn user_agent(&self) -> String {
        format!(
            "subgraph-client / {}",
            self.agent_name.as_deref().unwrap_or("Unknown sender")
        )
    }

    /// Immutable retry policy derived from this configuration.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retries,
            base_timeout: Duration::from_millis(self.query_timeout_ms),
            timeout_increment: Duration::from_millis(self.timeout_increment_ms),
            backoff: Duration::from_millis(self.backoff_ms),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", key, raw)),
        None => Ok(default),
    }
}
