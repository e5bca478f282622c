//! A small asynchronous HTTP/1.1 server core
//!
//! This crate parses HTTP/1.1 request heads incrementally from arbitrarily fragmented
//! byte streams and writes responses through a writer that only accepts the sections
//! of a response in wire order, including chunked bodies followed by trailers.
//!
//! # Example
//!
//! ```no_run
//! use http::StatusCode;
//! use tokio::io::AsyncWrite;
//! use tracing::Level;
//! use tracing_subscriber::FmtSubscriber;
//! use wire_http::connection::ResponseWriter;
//! use wire_http::handler::{Handler, HandlerError};
//! use wire_http::protocol::{Request, default_headers};
//! use wire_http::server::Server;
//!
//! struct HelloWorld;
//!
//! impl<W: AsyncWrite + Unpin + Send> Handler<W> for HelloWorld {
//!     async fn call(&self, request: Request, writer: &mut ResponseWriter<W>) -> Result<(), HandlerError> {
//!         tracing::info!(target = request.target(), "request target");
//!         let body = b"Hello World!\r\n";
//!         writer.write_status_line(StatusCode::OK).await?;
//!         writer.write_headers(&default_headers(body.len())).await?;
//!         writer.write_body(body).await?;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
//!     tracing::subscriber::set_global_default(subscriber)?;
//!
//!     let server = Server::builder().address("127.0.0.1:42069").handler(HelloWorld).build()?;
//!     let handle = server.start().await?;
//!     tokio::signal::ctrl_c().await?;
//!     handle.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: Requests, the header collection and error types
//! - [`codec`]: Request decoding and response section encoding
//! - [`connection`]: One request/response exchange and the [`connection::ResponseWriter`]
//! - [`handler`]: The [`handler::Handler`] trait user code implements
//! - [`relay`]: Streams an upstream body as chunks with `X-Content-SHA256` and
//!   `X-Content-Length` trailers
//! - [`server`]: TCP listener with a start/stop lifecycle
//!
//! # Limitations
//!
//! - One request per connection, the connection is closed after the response
//! - Request bodies are not read; bytes after the head stay in the read buffer
//! - Maximum request head size defaults to 8KB

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod relay;
pub mod server;

mod utils;
pub(crate) use utils::ensure;
