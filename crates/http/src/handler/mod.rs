//! Request handler trait.
//!
//! A handler receives the parsed [`Request`] and a [`ResponseWriter`] positioned at
//! [`WriterState::StatusLine`](crate::connection::WriterState::StatusLine), and is
//! expected to drive the writer through every section before returning.
//!
//! # Example
//!
//! ```
//! use http::StatusCode;
//! use tokio::io::AsyncWrite;
//! use wire_http::connection::ResponseWriter;
//! use wire_http::handler::{Handler, HandlerError};
//! use wire_http::protocol::{Request, default_headers};
//!
//! struct Hello;
//!
//! impl<W: AsyncWrite + Unpin + Send> Handler<W> for Hello {
//!     async fn call(&self, _request: Request, writer: &mut ResponseWriter<W>) -> Result<(), HandlerError> {
//!         let body = b"Hello World!";
//!         writer.write_status_line(StatusCode::OK).await?;
//!         writer.write_headers(&default_headers(body.len())).await?;
//!         writer.write_body(body).await?;
//!         Ok(())
//!     }
//! }
//! ```

use std::error::Error;

use crate::connection::ResponseWriter;
use crate::protocol::Request;

/// Error returned by a handler
pub type HandlerError = Box<dyn Error + Send + Sync>;

#[trait_variant::make(Send)]
pub trait Handler<W> {
    /// Writes the response for `request` through `writer`.
    ///
    /// An error returned before the status line was written is turned into a
    /// `500 Internal Server Error` response by the connection.
    async fn call(&self, request: Request, writer: &mut ResponseWriter<W>) -> Result<(), HandlerError>;
}
