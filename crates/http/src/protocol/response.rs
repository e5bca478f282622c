//! Response-side helpers shared by the writer and handlers.

use http::StatusCode;
use http::header::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE};

use crate::protocol::HeaderCollection;

/// Reason phrase written on the status line for `status`.
///
/// Backed by the static table in [`StatusCode::canonical_reason`]; unknown codes
/// get an empty phrase, which the grammar allows.
pub fn reason_phrase(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("")
}

/// Headers sent with every plain response: `content-length`, `connection: close`
/// and a `text/plain` content type.
pub fn default_headers(content_length: usize) -> HeaderCollection {
    let mut headers = HeaderCollection::new();
    // the names and values below are static and always valid
    let _ = headers.override_value(CONTENT_LENGTH.as_str(), &content_length.to_string());
    let _ = headers.override_value(CONNECTION.as_str(), "close");
    let _ = headers.override_value(CONTENT_TYPE.as_str(), mime::TEXT_PLAIN.as_ref());
    headers
}
