//! Protocol types shared by the parser, the response writer and handlers.
//!
//! - **Headers** ([`header`]): [`HeaderCollection`] with case-insensitive,
//!   multi-value semantics and single-line wire parsing
//! - **Requests** ([`request`]): [`Request`], [`RequestLine`] and the parser's
//!   [`ParseState`]
//! - **Responses** ([`response`]): reason phrases and default response headers
//! - **Chunks** ([`ChunkItem`]): pieces of an outgoing chunked body
//! - **Errors** ([`error`]): [`HttpError`], [`ParseError`], [`SendError`],
//!   [`HeaderError`]

mod header;
pub use header::HeaderCollection;
pub use header::HeaderStatus;
pub(crate) use header::is_token_char;

mod chunk;
pub use chunk::ChunkItem;

mod request;
pub use request::ParseState;
pub use request::Request;
pub use request::RequestLine;

mod response;
pub use response::default_headers;
pub use response::reason_phrase;

mod error;
pub use error::HeaderError;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
