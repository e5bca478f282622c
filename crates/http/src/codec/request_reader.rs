//! Reads one request head from a byte stream.
//!
//! [`RequestReader`] drives the outer loop around [`RequestDecoder`]: read whatever the
//! stream has into a [`ParseBuffer`], run one parse pass over the valid bytes, shift
//! the consumed prefix out, and repeat until the decoder reports
//! [`ParseState::Done`](crate::protocol::ParseState::Done).

use tokio::io::AsyncRead;
use tracing::{debug, trace};

use crate::codec::{ParseBuffer, RequestDecoder};
use crate::ensure;
use crate::protocol::{ParseError, Request};

/// Default initial capacity of the parse buffer
pub const DEFAULT_INITIAL_BUFFER_SIZE: usize = 1024;

/// Default maximum size of a request head
pub const DEFAULT_MAX_HEAD_SIZE: usize = 8 * 1024;

#[derive(Debug)]
pub struct RequestReader<R> {
    reader: R,
    buffer: ParseBuffer,
    decoder: RequestDecoder,
    /// Head bytes already parsed and shifted out of the buffer
    consumed: usize,
    max_head_size: usize,
}

impl<R> RequestReader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_INITIAL_BUFFER_SIZE, DEFAULT_MAX_HEAD_SIZE)
    }

    /// Creates a reader whose buffer starts at `initial_size` bytes and that accepts a
    /// request head of at most `max_head_size` bytes, request line included.
    pub fn with_capacity(reader: R, initial_size: usize, max_head_size: usize) -> Self {
        Self {
            reader,
            buffer: ParseBuffer::with_capacity(initial_size.min(max_head_size)),
            decoder: RequestDecoder::new(),
            consumed: 0,
            max_head_size,
        }
    }

    /// Reads until the request head is complete.
    ///
    /// # Errors
    ///
    /// - [`ParseError::Incomplete`] if the stream ends first
    /// - [`ParseError::TooLargeHeader`] if the head does not fit in the maximum size
    /// - [`ParseError::Io`] for read failures
    /// - [`ParseError::AlreadyDone`] if a request was already read
    /// - any request line or header error
    pub async fn read_request(&mut self) -> Result<Request, ParseError> {
        ensure!(!self.decoder.is_done(), ParseError::AlreadyDone);

        loop {
            if self.buffer.is_full() {
                self.buffer.grow(self.max_head_size);
                trace!(capacity = self.buffer.capacity(), "grew parse buffer");
            }

            let read = self.buffer.read_from(&mut self.reader).await?;
            if read == 0 {
                debug!(
                    state = %self.decoder.state(),
                    buffered = self.buffer.len(),
                    "stream ended before request was complete"
                );
                return Err(ParseError::incomplete(self.decoder.state(), self.buffer.len()));
            }

            let parsed = self.decoder.parse(self.buffer.filled())?;
            self.buffer.consume(parsed);
            self.consumed += parsed;
            trace!(read, parsed, buffered = self.buffer.len(), "parse pass");

            if let Some(request) = self.decoder.take_request() {
                return Ok(request);
            }

            // the head is still open, so everything seen so far belongs to it
            let head_size = self.consumed + self.buffer.len();
            ensure!(head_size < self.max_head_size, ParseError::too_large_header(head_size, self.max_head_size));
        }
    }

    /// Bytes received after the request head, such as the start of a body.
    pub fn buffered(&self) -> &[u8] {
        self.buffer.filled()
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
