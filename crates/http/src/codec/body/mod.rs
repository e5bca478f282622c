//! HTTP body encoding for outgoing responses.
//!
//! - [`ChunkedEncoder`]: Implements chunked transfer encoding (RFC 9112 section 7.1)
//!
//! Fixed-length bodies need no framing and are written verbatim by the response
//! writer. Request bodies are never decoded.

mod chunked_encoder;

pub use chunked_encoder::ChunkedEncoder;
