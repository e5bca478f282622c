//! Encoders for the line-oriented parts of a response: the status line, the header
//! block and the trailer block that follows a chunked body.
//!
//! All three implement [`Encoder`] and only append to the destination buffer, so a
//! caller can stage a section completely before any byte reaches the socket.

use bytes::{BufMut, BytesMut};
use http::StatusCode;
use http::header::TRAILER;
use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;
use tracing::trace;

use crate::protocol::{HeaderCollection, SendError, reason_phrase};
use crate::utils::CRLF;

/// Initial buffer size reserved for a header block
const INIT_HEADER_SIZE: usize = 1024;

/// Encodes `HTTP/1.1 <code> <reason>\r\n`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatusLineEncoder;

impl Encoder<StatusCode> for StatusLineEncoder {
    type Error = SendError;

    fn encode(&mut self, status: StatusCode, dst: &mut BytesMut) -> Result<(), Self::Error> {
        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", status.as_str(), reason_phrase(status))?;
        Ok(())
    }
}

/// Encodes every entry as `name: value\r\n` followed by the blank line.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderEncoder;

impl Encoder<&HeaderCollection> for HeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, headers: &HeaderCollection, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE);
        for (name, value) in headers.iter() {
            put_field(dst, name, value);
        }
        dst.put_slice(CRLF);
        Ok(())
    }
}

/// Encodes the trailer section announced by the `Trailer` header.
///
/// Only names listed in `Trailer` that are present in the collection are written,
/// spelled as they were declared. The closing blank line is always written.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrailerEncoder;

impl Encoder<&HeaderCollection> for TrailerEncoder {
    type Error = SendError;

    fn encode(&mut self, headers: &HeaderCollection, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if let Some(declared) = headers.get(TRAILER.as_str()) {
            for name in declared.split(',').map(str::trim).filter(|name| !name.is_empty()) {
                match headers.get(name) {
                    Some(value) => put_field(dst, name, value),
                    None => trace!(trailer = name, "declared trailer has no value, skipped"),
                }
            }
        }
        dst.put_slice(CRLF);
        Ok(())
    }
}

fn put_field(dst: &mut BytesMut, name: &str, value: &str) {
    dst.put_slice(name.as_bytes());
    dst.put_slice(b": ");
    dst.put_slice(value.as_bytes());
    dst.put_slice(CRLF);
}

/// Fast writer implementation for writing to BytesMut.
///
/// Lets `write!` format straight into the destination buffer.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
