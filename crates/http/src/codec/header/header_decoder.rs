//! Incremental decoder for a single HTTP header field line.
//!
//! Each call looks at the front of the buffer only: either a full `name: value\r\n`
//! line is parsed into the target [`HeaderCollection`], the blank line ending the
//! header block is recognised, or nothing happens because the line is not complete
//! yet. Callers feed the remaining bytes back in after advancing past whatever was
//! consumed, which makes the decoder indifferent to how the input was fragmented.
//!
//! # Line grammar
//!
//! ```text
//! field-line = OWS field-name ":" OWS field-value OWS CRLF
//! ```
//!
//! Whitespace between the name and the colon is rejected. Leading whitespace before
//! the name is tolerated and dropped.

use std::borrow::Cow;

use tracing::trace;

use crate::ensure;
use crate::protocol::{HeaderCollection, HeaderStatus, ParseError, is_token_char};
use crate::utils::{CRLF, find_crlf};

/// Decoder for one header line at a time.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderDecoder;

impl HeaderDecoder {
    /// Parses the next header line of `src` into `headers`.
    ///
    /// # Returns
    ///
    /// - `Ok(HeaderStatus::Partial)` if `src` holds no complete line yet
    /// - `Ok(HeaderStatus::End { consumed: 2 })` on the blank line
    /// - `Ok(HeaderStatus::Field { consumed })` after storing a field
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidHeader`] when the colon is missing, the name is
    /// followed by whitespace, the name is not a token, or the value is not UTF-8 or
    /// carries control characters other than tab.
    pub fn decode_line(&self, src: &[u8], headers: &mut HeaderCollection) -> Result<HeaderStatus, ParseError> {
        let Some(line_end) = find_crlf(src) else {
            return Ok(HeaderStatus::Partial);
        };

        if line_end == 0 {
            return Ok(HeaderStatus::End { consumed: CRLF.len() });
        }

        let line = &src[..line_end];
        let colon = line
            .iter()
            .position(|b| *b == b':')
            .ok_or_else(|| ParseError::invalid_header(format!("missing colon in line {:?}", lossy(line))))?;

        let (name, value) = (&line[..colon], &line[colon + 1..]);
        ensure!(
            !name.ends_with(b" ") && !name.ends_with(b"\t"),
            ParseError::invalid_header(format!("whitespace before colon in header name {:?}", lossy(name)))
        );

        let name = name.trim_ascii_start();
        ensure!(
            !name.is_empty() && name.iter().all(|b| is_token_char(*b)),
            ParseError::invalid_header(format!("invalid header token found: {:?}", lossy(name)))
        );

        let value = value.trim_ascii();
        let value = std::str::from_utf8(value)
            .map_err(|_e| ParseError::invalid_header(format!("header {:?} has a value that is not utf-8", lossy(name))))?;

        headers.set(&lossy(name), value)?;
        trace!(header_name = %lossy(name), line_size = line_end, "parsed header line");

        Ok(HeaderStatus::Field { consumed: line_end + CRLF.len() })
    }
}

fn lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}
