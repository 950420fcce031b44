//! Classify query attempt failures into retry policy error kinds.

use super::error::QueryError;
use super::policy::ErrorKind;

/// Ordered substring rules for backend-reported error text, first match wins.
/// String matching against backend phrasing is brittle by nature; keeping it
/// as one table means new phrasings can be added without touching control
/// flow.
const MESSAGE_RULES: &[(&str, ErrorKind)] = &[
    ("Unexpected token", ErrorKind::MalformedQuery),
    ("Unexpected `", ErrorKind::MalformedQuery),
    ("Syntax Error", ErrorKind::MalformedQuery),
    ("Invalid request. Status", ErrorKind::Http),
    ("Invalid response", ErrorKind::Graphql),
];

/// Match free-form error text against the ordered rule table.
pub fn classify_message(message: &str) -> Option<ErrorKind> {
    MESSAGE_RULES
        .iter()
        .find(|(needle, _)| message.contains(needle))
        .map(|(_, kind)| *kind)
}

/// Classify a query error into an [`ErrorKind`].
///
/// Typed variants map directly; backend-reported GraphQL error text goes
/// through [`classify_message`] so syntax errors can be recognized as
/// non-retryable. Total and pure: never panics, same input gives same kind.
pub fn classify(e: &QueryError) -> ErrorKind {
    match e {
        QueryError::Timeout { .. } | QueryError::Cancelled => ErrorKind::Timeout,
        QueryError::Http { .. } => ErrorKind::Http,
        QueryError::Graphql { message, .. } => {
            classify_message(message).unwrap_or(ErrorKind::Graphql)
        }
        QueryError::InvalidResponse { .. } => ErrorKind::Graphql,
        QueryError::Network(e) if e.is_timeout() => ErrorKind::Timeout,
        QueryError::Network(_) => ErrorKind::Network,
        QueryError::Decode(_) => ErrorKind::Unknown,
    }
}
