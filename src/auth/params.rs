//! Typed access to request parameters.

use axum::{extract::Query, http::Uri};

/// Return the first value of query parameter `name`, percent-decoded.
///
/// A missing query string, a missing key, or a query string that does not
/// parse all yield `None`.
pub fn query_param(uri: &Uri, name: &str) -> Option<String> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri).ok()?;

    pairs
        .into_iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}
