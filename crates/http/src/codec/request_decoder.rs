//! HTTP request decoder module
//!
//! This module parses an HTTP/1.1 request head incrementally. The decoder can be fed
//! any prefix of the request: it consumes what it can, remembers where it stopped and
//! resumes from there when called again with the unconsumed bytes plus whatever
//! arrived since.
//!
//! # State Machine
//!
//! ```text
//! Initialized --request line--> ParsingHeaders --blank line--> Done
//! ```
//!
//! - `Initialized`: waits for a `\r\n` terminated request line
//! - `ParsingHeaders`: parses header lines through [`HeaderDecoder`]
//! - `Done`: the request is complete, parsing again is an error
//!
//! # Example
//!
//! ```
//! use wire_http::codec::RequestDecoder;
//!
//! let mut decoder = RequestDecoder::new();
//! let consumed = decoder.parse(b"GET /coffee HTTP/1.1\r\nHo").unwrap();
//! assert_eq!(consumed, 22);
//!
//! let consumed = decoder.parse(b"Host: localhost:42069\r\n\r\n").unwrap();
//! assert_eq!(consumed, 25);
//!
//! let request = decoder.take_request().unwrap();
//! assert_eq!(request.target(), "/coffee");
//! assert_eq!(request.headers().get("host"), Some("localhost:42069"));
//! ```

use std::mem;

use bytes::{Buf, BytesMut};
use http::Method;
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::header::HeaderDecoder;
use crate::ensure;
use crate::protocol::{HeaderCollection, ParseError, ParseState, Request, RequestLine};
use crate::utils::{CRLF, find_crlf};

/// The only protocol version accepted on the request line
const HTTP_VERSION: &str = "1.1";

/// An incremental decoder for an HTTP request head
///
/// The decoder owns the request being built until it reaches [`ParseState::Done`],
/// after which [`RequestDecoder::take_request`] hands it out.
#[derive(Debug)]
pub struct RequestDecoder {
    state: ParseState,
    request_line: Option<RequestLine>,
    headers: HeaderCollection,
    header_decoder: HeaderDecoder,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ParseState::Done
    }

    /// Runs one parse pass over `src` and returns how many bytes were consumed.
    ///
    /// Consumed bytes must not be passed in again. Returning `Ok(0)` means a complete
    /// line is not available yet.
    ///
    /// # Errors
    ///
    /// - [`ParseError::AlreadyDone`] if the request was already complete
    /// - any request line or header error, which is fatal to the request
    pub fn parse(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        ensure!(!self.is_done(), ParseError::AlreadyDone);

        let mut parsed = 0;
        while !self.is_done() {
            let consumed = self.parse_single(&src[parsed..])?;
            if consumed == 0 {
                break;
            }
            parsed += consumed;
        }

        Ok(parsed)
    }

    /// Hands out the request once parsing is done.
    ///
    /// Returns `None` before [`ParseState::Done`] or if the request was already taken.
    pub fn take_request(&mut self) -> Option<Request> {
        if !self.is_done() {
            return None;
        }
        let line = self.request_line.take()?;
        Some(Request::new(line, mem::take(&mut self.headers)))
    }

    fn parse_single(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParseState::Initialized => match parse_request_line(src)? {
                Some((request_line, consumed)) => {
                    trace!(method = %request_line.method(), target = request_line.target(), "parsed request line");
                    self.request_line = Some(request_line);
                    self.state = ParseState::ParsingHeaders;
                    Ok(consumed)
                }
                None => Ok(0),
            },
            ParseState::ParsingHeaders => {
                let status = self.header_decoder.decode_line(src, &mut self.headers)?;
                if status.is_end() {
                    trace!(header_count = self.headers.len(), "parsed request headers");
                    self.state = ParseState::Done;
                }
                Ok(status.consumed())
            }
            ParseState::Done => Err(ParseError::AlreadyDone),
        }
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self {
            state: ParseState::Initialized,
            request_line: None,
            headers: HeaderCollection::new(),
            header_decoder: HeaderDecoder,
        }
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to decode an HTTP request head from the provided buffer
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: the header block is complete
    /// - `Ok(None)`: need more data to proceed, or the request was already returned
    ///   and nothing follows it
    /// - `Err(_)`: encountered a parsing error
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.is_done() && src.is_empty() {
            return Ok(None);
        }

        let parsed = self.parse(src)?;
        src.advance(parsed);
        Ok(self.take_request())
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(request) => Ok(Some(request)),
            None if self.is_done() => Ok(None),
            None => Err(ParseError::incomplete(self.state, src.len())),
        }
    }
}

/// Parses `METHOD SP target SP HTTP/1.1 CRLF` from the front of `src`.
///
/// Returns `Ok(None)` if no complete line is buffered yet.
fn parse_request_line(src: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(line_end) = find_crlf(src) else {
        return Ok(None);
    };

    let raw = &src[..line_end];
    let line =
        std::str::from_utf8(raw).map_err(|_e| ParseError::malformed_request_line(String::from_utf8_lossy(raw)))?;

    let parts = line.split(' ').collect::<Vec<_>>();
    let &[method, target, version] = parts.as_slice() else {
        return Err(ParseError::malformed_request_line(line));
    };

    ensure!(!method.is_empty() && method.bytes().all(|b| b.is_ascii_uppercase()), ParseError::invalid_method(method));
    ensure!(!target.is_empty(), ParseError::malformed_request_line(line));

    let Some((protocol, number)) = version.split_once('/') else {
        return Err(ParseError::malformed_request_line(line));
    };
    ensure!(protocol == "HTTP" && number == HTTP_VERSION, ParseError::invalid_version(version));

    let method = Method::from_bytes(method.as_bytes()).map_err(|_e| ParseError::invalid_method(method))?;

    Ok(Some((RequestLine::new(method, target.to_owned()), line_end + CRLF.len())))
}
