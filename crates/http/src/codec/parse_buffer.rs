//! Growable read buffer used while a request head is being parsed.
//!
//! The buffer keeps a high-water mark of valid bytes. Reads land right after the
//! mark, the capacity doubles when there is no room left, and bytes accepted by the
//! parser are shifted out of the front so the valid region always starts at zero.

use bytes::BytesMut;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};

#[derive(Debug)]
pub struct ParseBuffer {
    buf: BytesMut,
    filled: usize,
}

impl ParseBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut buf = BytesMut::with_capacity(capacity);
        buf.resize(capacity, 0);
        Self { buf, filled: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of valid bytes.
    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    pub fn is_full(&self) -> bool {
        self.filled == self.buf.len()
    }

    /// The valid bytes, starting at the front of the buffer.
    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.filled]
    }

    /// Doubles the capacity, never going past `limit` unless the buffer is already
    /// at least that large.
    pub fn grow(&mut self, limit: usize) {
        let current = self.buf.len();
        let target = current.saturating_mul(2).min(limit).max(current + 1);
        self.buf.resize(target, 0);
    }

    /// Drops `n` bytes from the front and moves the rest down.
    ///
    /// # Panics
    ///
    /// Panics if `n` is larger than the number of valid bytes.
    pub fn consume(&mut self, n: usize) {
        assert!(n <= self.filled, "consume {n} bytes but only {} are buffered", self.filled);
        if n == 0 {
            return;
        }
        self.buf.copy_within(n..self.filled, 0);
        self.filled -= n;
    }

    /// Reads once from `reader` into the free space after the high-water mark,
    /// doubling the capacity first if the buffer is full.
    ///
    /// Returns the number of bytes read; `0` means end of input.
    pub async fn read_from<R>(&mut self, reader: &mut R) -> io::Result<usize>
    where
        R: AsyncRead + Unpin,
    {
        if self.is_full() {
            self.grow(usize::MAX);
        }
        let read = reader.read(&mut self.buf[self.filled..]).await?;
        self.filled += read;
        Ok(read)
    }
}
