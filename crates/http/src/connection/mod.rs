//! HTTP connection handling module
//!
//! # Components
//!
//! - [`HttpConnection`]: Runs one request/response exchange:
//!   - Reads the request head through a growable parse buffer
//!   - Answers malformed requests with `400 Bad Request`
//!   - Hands the request and a bound [`ResponseWriter`] to the handler
//!   - Falls back to `500 Internal Server Error` when the handler fails early
//!
//! - [`ResponseWriter`]: Writes the status line, headers, body and trailers of a
//!   response strictly in that order, tracked by [`WriterState`]

mod http_connection;
mod response_writer;

pub use http_connection::HttpConnection;
pub use response_writer::ResponseWriter;
pub use response_writer::WriterState;

use crate::codec::{DEFAULT_INITIAL_BUFFER_SIZE, DEFAULT_MAX_HEAD_SIZE};

/// Per-connection buffer settings
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Starting capacity of the request parse buffer, doubled on demand
    pub initial_buffer_size: usize,
    /// Largest request head, request line and header lines together, accepted before
    /// failing with `TooLargeHeader`
    pub max_head_size: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { initial_buffer_size: DEFAULT_INITIAL_BUFFER_SIZE, max_head_size: DEFAULT_MAX_HEAD_SIZE }
    }
}
