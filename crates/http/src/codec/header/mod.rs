//! HTTP header processing module for encoding and decoding headers
//!
//! # Components
//!
//! - [`HeaderDecoder`]: Parses one header line at a time into a
//!   [`HeaderCollection`](crate::protocol::HeaderCollection)
//!   - Validates field names as tokens
//!   - Rejects whitespace before the colon
//!   - Signals the blank line ending the header block
//!
//! - [`StatusLineEncoder`], [`HeaderEncoder`], [`TrailerEncoder`]: Serialize the
//!   status line, the header block and the trailer block of a response

mod header_decoder;
mod header_encoder;

pub use header_decoder::HeaderDecoder;
pub use header_encoder::HeaderEncoder;
pub use header_encoder::StatusLineEncoder;
pub use header_encoder::TrailerEncoder;
