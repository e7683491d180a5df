//! Canonical request of AWS SigV4.
//!
//! - [Create a canonical request](https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html#create-canonical-request)

use crate::constants::AWS_QUERY_ENCODE_SET;
use percent_encoding::{percent_decode_str, percent_encode};
use speechsign_core::SigningRequest;
use std::borrow::Cow;

/// The canonical form of one request and the header names it covers.
///
/// Only lives for a single signing operation: it exists to be hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    /// `method\npath\nquery\ncanonical_headers\nsigned_headers\npayload_hash`
    pub request: String,
    /// Lower-cased, sorted header names joined with `;`.
    pub signed_headers: String,
}

/// Build the canonical request.
///
/// - `path` is used as given. It must already be percent-encoded and is never
///   re-encoded here.
/// - `query` is used as given. Use [`canonical_query_string`] to derive it
///   from a raw query.
/// - Header names are lower-cased and sorted in ascending byte order. Values
///   are trimmed; repeated names are joined with `,` in insertion order.
///
/// A missing `host` header is not checked here. Callers must set it before,
/// otherwise the remote side rejects the signature.
pub fn canonical_request<'a, I, V>(
    method: &str,
    path: &str,
    query: &str,
    headers: I,
    payload_hash: &str,
) -> CanonicalRequest
where
    I: IntoIterator<Item = (&'a str, V)>,
    V: AsRef<str>,
{
    let mut headers = headers
        .into_iter()
        .map(|(k, v)| {
            (
                k.to_lowercase(),
                SigningRequest::header_value_normalize(v.as_ref()).to_string(),
            )
        })
        .collect::<Vec<_>>();
    // Never trust the iteration order of a header map. The sort is stable so
    // repeated headers keep their insertion order.
    headers.sort_by(|(l, _), (r, _)| l.as_bytes().cmp(r.as_bytes()));

    let mut canonical_headers = String::with_capacity(128);
    let mut signed_headers: Vec<&str> = Vec::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        if signed_headers.last() == Some(&name.as_str()) {
            // Fold into the previous line: drop its newline and append.
            canonical_headers.pop();
            canonical_headers.push(',');
        } else {
            signed_headers.push(name);
            canonical_headers.push_str(name);
            canonical_headers.push(':');
        }
        canonical_headers.push_str(value);
        canonical_headers.push('\n');
    }
    let signed_headers = signed_headers.join(";");

    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256 + canonical_headers.len());
    for part in [method, path, query, canonical_headers.as_str()] {
        f.push_str(part);
        f.push('\n');
    }
    f.push_str(&signed_headers);
    f.push('\n');
    f.push_str(payload_hash);

    CanonicalRequest {
        request: f,
        signed_headers,
    }
}

/// Build the canonical query string from a raw query.
///
/// Parameters are percent-decoded to raw bytes, re-encoded with the AWS
/// UriEncode rules, sorted by encoded name then value, and joined with `&`.
/// Parameters without value keep a trailing `=`. A `+` is read as space.
pub fn canonical_query_string(query: &str) -> String {
    let mut params = query
        .split('&')
        .filter(|v| !v.is_empty())
        .map(|v| {
            let (k, v) = v.split_once('=').unwrap_or((v, ""));
            (uri_encode(k), uri_encode(v))
        })
        .collect::<Vec<_>>();
    params.sort();

    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Re-encode one query component without going through utf-8, so the bytes
/// on the wire and the bytes signed stay the same.
fn uri_encode(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    let bytes: Cow<'_, [u8]> = percent_decode_str(&raw).into();
    percent_encode(&bytes, &AWS_QUERY_ENCODE_SET).to_string()
}
