//! Encoder for HTTP chunked transfer encoding.
//!
//! Every chunk is framed as `<hex size>\r\n<data>\r\n`. The end of the body is the
//! zero-size chunk `0\r\n`; the trailer section and its closing blank line are
//! written separately by [`TrailerEncoder`](crate::codec::TrailerEncoder).

use crate::ensure;
use crate::protocol::{ChunkItem, SendError};
use crate::utils::CRLF;
use bytes::{Buf, BufMut, BytesMut};
use std::io::Write;

use tokio_util::codec::Encoder;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkedEncoder {
    /// Set once the terminating chunk has been encoded
    finished: bool,
}

impl ChunkedEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: Buf> Encoder<ChunkItem<D>> for ChunkedEncoder {
    type Error = SendError;

    fn encode(&mut self, item: ChunkItem<D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if self.finished {
            warn!(size = item.size(), "chunk dropped, body already terminated");
            return Ok(());
        }

        let size = item.size();
        match item {
            ChunkItem::Data(bytes) => {
                ensure!(size > 0, SendError::EmptyChunk);

                write!(helper::Writer(dst), "{size:x}\r\n")?;
                dst.reserve(size + CRLF.len());
                dst.put(bytes);
                dst.extend_from_slice(CRLF);
                Ok(())
            }
            ChunkItem::Last => {
                self.finished = true;
                dst.extend_from_slice(b"0\r\n");
                Ok(())
            }
        }
    }
}

mod helper {
    use bytes::{BufMut, BytesMut};
    use std::io;

    pub struct Writer<'a>(pub &'a mut BytesMut);

    impl io::Write for Writer<'_> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.put_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
