//! State-checked HTTP/1.1 response writer.
//!
//! [`ResponseWriter`] only lets a response be written in wire order:
//!
//! ```text
//! StatusLine --write_status_line--> Headers --write_headers--> Body
//! Body --write_chunked_done--> Trailers --write_trailers--> Complete
//! ```
//!
//! `write_body` and `write_chunked_chunk` may be called any number of times while in
//! `Body`. A call made in any other state fails with [`SendError::StateMismatch`]
//! before anything is staged or written.

use std::fmt;

use bytes::BytesMut;
use http::StatusCode;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;
use tracing::error;

use crate::codec::{ChunkedEncoder, HeaderEncoder, StatusLineEncoder, TrailerEncoder};
use crate::ensure;
use crate::protocol::{ChunkItem, HeaderCollection, SendError};

/// Section of the response the writer expects next.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum WriterState {
    StatusLine,
    Headers,
    Body,
    Trailers,
    /// Trailers were written, the message is closed
    Complete,
}

impl fmt::Display for WriterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WriterState::StatusLine => "status line",
            WriterState::Headers => "headers",
            WriterState::Body => "body",
            WriterState::Trailers => "trailers",
            WriterState::Complete => "complete",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    buffer: BytesMut,
    state: WriterState,
    chunked_encoder: ChunkedEncoder,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self::with_capacity(writer, 1024)
    }

    pub fn with_capacity(writer: W, buffer_size: usize) -> Self {
        Self {
            writer,
            buffer: BytesMut::with_capacity(buffer_size),
            state: WriterState::StatusLine,
            chunked_encoder: ChunkedEncoder::new(),
        }
    }

    #[inline]
    pub fn state(&self) -> WriterState {
        self.state
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Writes `HTTP/1.1 <code> <reason>\r\n`.
    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), SendError> {
        self.expect_state(WriterState::StatusLine)?;
        StatusLineEncoder.encode(status, &mut self.buffer)?;
        self.send_buffer().await?;
        self.state = WriterState::Headers;
        Ok(())
    }

    /// Writes every header followed by the blank line that starts the body.
    pub async fn write_headers(&mut self, headers: &HeaderCollection) -> Result<(), SendError> {
        self.expect_state(WriterState::Headers)?;
        HeaderEncoder.encode(headers, &mut self.buffer)?;
        self.send_buffer().await?;
        self.state = WriterState::Body;
        Ok(())
    }

    /// Writes raw body bytes. The state stays at `Body`.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, SendError> {
        self.expect_state(WriterState::Body)?;
        self.writer.write_all(body).await?;
        self.writer.flush().await?;
        Ok(body.len())
    }

    /// Writes `chunk` framed as one chunk of a chunked body.
    ///
    /// Returns the number of bytes written including framing.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::EmptyChunk`] for an empty `chunk`, since a zero-size chunk
    /// would end the body; use [`ResponseWriter::write_chunked_done`] for that.
    pub async fn write_chunked_chunk(&mut self, chunk: &[u8]) -> Result<usize, SendError> {
        self.expect_state(WriterState::Body)?;
        self.chunked_encoder.encode(ChunkItem::Data(chunk), &mut self.buffer)?;
        let written = self.buffer.len();
        self.send_buffer().await?;
        Ok(written)
    }

    /// Writes the terminating `0\r\n` chunk and moves on to the trailers.
    pub async fn write_chunked_done(&mut self) -> Result<(), SendError> {
        self.expect_state(WriterState::Body)?;
        self.chunked_encoder.encode(ChunkItem::<&[u8]>::Last, &mut self.buffer)?;
        self.send_buffer().await?;
        self.state = WriterState::Trailers;
        Ok(())
    }

    /// Writes the trailers declared by the `Trailer` header of `headers`, then the
    /// blank line closing the message.
    pub async fn write_trailers(&mut self, headers: &HeaderCollection) -> Result<(), SendError> {
        self.expect_state(WriterState::Trailers)?;
        TrailerEncoder.encode(headers, &mut self.buffer)?;
        self.send_buffer().await?;
        self.state = WriterState::Complete;
        Ok(())
    }

    #[inline]
    pub async fn flush(&mut self) -> Result<(), SendError> {
        Ok(self.writer.flush().await?)
    }

    pub async fn shutdown(&mut self) -> Result<(), SendError> {
        Ok(self.writer.shutdown().await?)
    }

    fn expect_state(&self, expected: WriterState) -> Result<(), SendError> {
        if self.state != expected {
            error!(expected = %expected, actual = %self.state, "response section written out of order");
        }
        ensure!(self.state == expected, SendError::state_mismatch(expected, self.state));
        Ok(())
    }

    async fn send_buffer(&mut self) -> Result<(), SendError> {
        let result = self.writer.write_all(&self.buffer).await;
        // a failed write leaves the stream unusable, staged bytes are never retried
        self.buffer.clear();
        result?;
        self.writer.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{HeaderStatus, default_headers};

    fn writer() -> ResponseWriter<Vec<u8>> {
        ResponseWriter::new(Vec::new())
    }

    fn output(writer: ResponseWriter<Vec<u8>>) -> String {
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[tokio::test]
    async fn fixed_length_response() {
        let mut writer = writer();
        let body = b"Hello World!";

        writer.write_status_line(StatusCode::OK).await.unwrap();
        let mut headers = HeaderCollection::new();
        headers.set("Content-Length", &body.len().to_string()).unwrap();
        writer.write_headers(&headers).await.unwrap();
        assert_eq!(writer.write_body(&body[..5]).await.unwrap(), 5);
        assert_eq!(writer.write_body(&body[5..]).await.unwrap(), 7);
        assert_eq!(writer.state(), WriterState::Body);

        assert_eq!(output(writer), "HTTP/1.1 200 OK\r\ncontent-length: 12\r\n\r\nHello World!");
    }

    #[tokio::test]
    async fn headers_before_status_line() {
        let mut writer = writer();

        let result = writer.write_headers(&default_headers(0)).await;

        assert!(matches!(
            result,
            Err(SendError::StateMismatch { expected: WriterState::Headers, actual: WriterState::StatusLine })
        ));
        assert_eq!(writer.state(), WriterState::StatusLine);
        assert!(writer.into_inner().is_empty());
    }

    #[tokio::test]
    async fn out_of_order_calls_write_nothing() {
        let mut writer = writer();
        writer.write_status_line(StatusCode::OK).await.unwrap();
        let written = writer.get_mut().len();

        assert!(writer.write_status_line(StatusCode::OK).await.is_err());
        assert!(writer.write_body(b"early").await.is_err());
        assert!(writer.write_chunked_chunk(b"early").await.is_err());
        assert!(writer.write_chunked_done().await.is_err());
        assert!(writer.write_trailers(&HeaderCollection::new()).await.is_err());

        assert_eq!(writer.get_mut().len(), written);
        assert_eq!(writer.state(), WriterState::Headers);
    }

    #[tokio::test]
    async fn full_chunked_cycle() {
        let mut writer = writer();
        let mut headers = HeaderCollection::new();
        headers.set("Transfer-Encoding", "chunked").unwrap();
        headers.set("Trailer", "X-Checksum").unwrap();

        let mut expected = String::from("HTTP/1.1 200 OK\r\n");
        for (name, value) in headers.iter() {
            expected.push_str(&format!("{name}: {value}\r\n"));
        }
        expected.push_str("\r\n3\r\nabc\r\n0\r\nX-Checksum: deadbeef\r\n\r\n");

        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&headers).await.unwrap();
        assert_eq!(writer.write_chunked_chunk(b"abc").await.unwrap(), 8);
        writer.write_chunked_done().await.unwrap();
        assert_eq!(writer.state(), WriterState::Trailers);

        headers.set("X-Checksum", "deadbeef").unwrap();
        writer.write_trailers(&headers).await.unwrap();
        assert_eq!(writer.state(), WriterState::Complete);

        assert_eq!(output(writer), expected);
    }

    #[tokio::test]
    async fn trailers_without_declaration() {
        let mut writer = writer();
        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&HeaderCollection::new()).await.unwrap();
        writer.write_chunked_chunk(b"hello").await.unwrap();
        writer.write_chunked_done().await.unwrap();
        writer.write_trailers(&HeaderCollection::new()).await.unwrap();

        assert_eq!(output(writer), "HTTP/1.1 200 OK\r\n\r\n5\r\nhello\r\n0\r\n\r\n");
    }

    #[tokio::test]
    async fn empty_chunk_is_rejected() {
        let mut writer = writer();
        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&HeaderCollection::new()).await.unwrap();
        let written = writer.get_mut().len();

        let result = writer.write_chunked_chunk(b"").await;

        assert!(matches!(result, Err(SendError::EmptyChunk)));
        assert_eq!(writer.get_mut().len(), written);
        assert_eq!(writer.state(), WriterState::Body);
    }

    #[tokio::test]
    async fn trailers_only_once() {
        let mut writer = writer();
        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&HeaderCollection::new()).await.unwrap();
        writer.write_chunked_done().await.unwrap();
        writer.write_trailers(&HeaderCollection::new()).await.unwrap();

        let result = writer.write_trailers(&HeaderCollection::new()).await;

        assert!(matches!(
            result,
            Err(SendError::StateMismatch { expected: WriterState::Trailers, actual: WriterState::Complete })
        ));
    }

    #[tokio::test]
    async fn unknown_status_code_has_empty_reason() {
        let mut writer = writer();
        writer.write_status_line(StatusCode::from_u16(299).unwrap()).await.unwrap();

        assert_eq!(output(writer), "HTTP/1.1 299 \r\n");
    }

    #[tokio::test]
    async fn written_headers_parse_back() {
        let mut headers = default_headers(1234);
        headers.override_value("Content-Type", "text/html").unwrap();
        headers.set("Set-Cookie", "a=1").unwrap();
        headers.set("Set-Cookie", "b=2").unwrap();
        headers.set("X-Empty", "").unwrap();

        let mut writer = writer();
        writer.write_status_line(StatusCode::OK).await.unwrap();
        writer.write_headers(&headers).await.unwrap();
        let wire = writer.into_inner();

        let mut src = &wire[b"HTTP/1.1 200 OK\r\n".len()..];
        let mut parsed = HeaderCollection::new();
        loop {
            let status = parsed.parse_one(src).unwrap();
            assert_ne!(status, HeaderStatus::Partial);
            src = &src[status.consumed()..];
            if status.is_end() {
                break;
            }
        }

        assert!(src.is_empty());
        assert_eq!(parsed, headers);
    }
}
