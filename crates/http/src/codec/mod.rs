//! HTTP codec module for decoding requests and encoding responses
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestDecoder`]: Incremental request-head parser, usable on its own or
//!     as a [`tokio_util::codec::Decoder`]
//!   - [`RequestReader`]: Read loop feeding a [`ParseBuffer`] into the decoder
//!   - Header line parsing via [`HeaderDecoder`]
//!
//! - Response handling:
//!   - [`StatusLineEncoder`], [`HeaderEncoder`], [`TrailerEncoder`]: line-oriented
//!     response sections
//!   - [`ChunkedEncoder`]: Chunked transfer encoding of the body
//!
//! # Example
//!
//! ```no_run
//! use wire_http::codec::RequestReader;
//! use tokio::net::TcpStream;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let stream = TcpStream::connect("127.0.0.1:42069").await?;
//! let mut reader = RequestReader::new(stream);
//! let request = reader.read_request().await?;
//! println!("{} {}", request.method(), request.target());
//! # Ok(())
//! # }
//! ```

mod body;
mod header;
mod parse_buffer;
mod request_decoder;
mod request_reader;

pub use body::ChunkedEncoder;
pub use header::{HeaderDecoder, HeaderEncoder, StatusLineEncoder, TrailerEncoder};
pub use parse_buffer::ParseBuffer;
pub use request_decoder::RequestDecoder;
pub use request_reader::{DEFAULT_INITIAL_BUFFER_SIZE, DEFAULT_MAX_HEAD_SIZE, RequestReader};
