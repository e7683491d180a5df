use std::mem;

use crate::{Error, Result};
use http::uri::Authority;
use http::HeaderMap;
use http::Method;

/// Signing context for request.
///
/// Built from `http::request::Parts` before signing and applied back after.
/// The URI itself is never rewritten, so the transport sends exactly the
/// path and query that were signed.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP authority, `None` for origin-form URIs.
    pub authority: Option<Authority>,
    /// HTTP path, as it appears on the wire.
    pub path: String,
    /// Raw HTTP query, without the leading `?`.
    pub query: String,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &http::request::Parts) -> Self {
        SigningRequest {
            method: parts.method.clone(),
            authority: parts.uri.authority().cloned(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().unwrap_or_default().to_string(),

            // Work on a copy so an abandoned signing leaves the request as is.
            headers: parts.headers.clone(),
        }
    }

    /// Apply the signing context back to http::request::Parts.
    pub fn apply(mut self, parts: &mut http::request::Parts) {
        mem::swap(&mut parts.headers, &mut self.headers);
    }

    /// Collect every header as `(name, value)` pairs.
    ///
    /// Repeated headers yield one pair per value, in insertion order. The
    /// order across different names is unspecified.
    ///
    /// Values that are not valid utf-8 can't be put into a canonical request
    /// without changing them, so they are rejected as invalid request.
    pub fn header_to_vec(&self) -> Result<Vec<(&str, &str)>> {
        self.headers
            .iter()
            .map(|(k, v)| {
                let value = std::str::from_utf8(v.as_bytes()).map_err(|e| {
                    Error::request_invalid(format!("header {k} is not valid utf-8"))
                        .with_source(e)
                })?;
                Ok((k.as_str(), value))
            })
            .collect()
    }

    /// Normalize header value by trimming leading and trailing spaces.
    pub fn header_value_normalize(v: &str) -> &str {
        v.trim_matches(' ')
    }
}
