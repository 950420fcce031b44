//! One HTTP POST exchange against the subgraph endpoint.

use crate::retry::QueryError;
use crate::types::{SubgraphResponse, Variables, UNKNOWN_PROVIDER};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Response header naming the backend instance that answered.
pub const PROVIDER_HEADER: &str = "x-subgraph-provider";

/// JSON body of a subgraph POST request.
#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    query: &'a str,
    variables: &'a Variables,
}

/// Performs one request/response exchange.
///
/// Returns the provider id read from the response header (or the unknown
/// sentinel) together with the decoded envelope. Data is decoded as loose
/// JSON here; the executor converts it to the caller's shape only after the
/// envelope passes validation. Cooperatively cancellable: the exchange is
/// abandoned as soon as `cancel` fires.
pub async fn post_query(
    http: &reqwest::Client,
    url: &Url,
    query: &str,
    variables: &Variables,
    user_agent: &str,
    cancel: CancellationToken,
) -> Result<(String, SubgraphResponse<serde_json::Value>), QueryError> {
    let request = http
        .post(url.clone())
        .header(CONTENT_TYPE, "application/json")
        .header(USER_AGENT, user_agent)
        .json(&QueryBody { query, variables })
        .send();

    let response = tokio::select! {
        res = request => res?,
        _ = cancel.cancelled() => return Err(QueryError::Cancelled),
    };

    let provider = response
        .headers()
        .get(PROVIDER_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(UNKNOWN_PROVIDER)
        .to_string();

    if !response.status().is_success() {
        return Err(QueryError::Http {
            status: response.status().as_u16(),
            provider,
        });
    }

    let body = response.json::<SubgraphResponse<serde_json::Value>>();
    let envelope = tokio::select! {
        res = body => res?,
        _ = cancel.cancelled() => return Err(QueryError::Cancelled),
    };

    Ok((provider, envelope))
}
