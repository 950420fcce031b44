//! Wire types for the subgraph HTTP envelope.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provider id used when the response carries no `x-subgraph-provider` header.
pub const UNKNOWN_PROVIDER: &str = "unknown";

/// Variables attached to a query. Absent keys are simply not inserted.
pub type Variables = BTreeMap<String, VariableValue>;

/// A single GraphQL variable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    String(String),
    Number(serde_json::Number),
    Bool(bool),
    StringList(Vec<String>),
}

impl From<&str> for VariableValue {
    fn from(v: &str) -> Self {
        VariableValue::String(v.to_string())
    }
}

impl From<String> for VariableValue {
    fn from(v: String) -> Self {
        VariableValue::String(v)
    }
}

impl From<bool> for VariableValue {
    fn from(v: bool) -> Self {
        VariableValue::Bool(v)
    }
}

impl From<i64> for VariableValue {
    fn from(v: i64) -> Self {
        VariableValue::Number(v.into())
    }
}

impl From<u64> for VariableValue {
    fn from(v: u64) -> Self {
        VariableValue::Number(v.into())
    }
}

impl From<Vec<String>> for VariableValue {
    fn from(v: Vec<String>) -> Self {
        VariableValue::StringList(v)
    }
}

/// One backend-reported error.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

/// The `errors` field of an envelope: servers send either a single error
/// object or a sequence.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GraphqlErrors {
    Many(Vec<GraphqlError>),
    One(GraphqlError),
}

impl GraphqlErrors {
    /// Flattens into the contained messages, in reported order.
    pub fn into_messages(self) -> Vec<String> {
        match self {
            GraphqlErrors::Many(errors) => errors.into_iter().map(|e| e.message).collect(),
            GraphqlErrors::One(error) => vec![error.message],
        }
    }
}

/// Decoded response body. A successful envelope has non-absent, non-empty
/// `data` and absent `errors`; everything else is a failed attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct SubgraphResponse<T> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<GraphqlErrors>,
}
