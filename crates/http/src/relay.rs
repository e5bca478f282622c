//! Streams an upstream body to the client as a chunked response with integrity
//! trailers.
//!
//! The relay announces two trailers, `X-Content-SHA256` and `X-Content-Length`, then
//! forwards upstream data in blocks of at most [`RELAY_BLOCK_SIZE`] bytes, one chunk per
//! block, while hashing and counting everything it forwards. When the upstream ends,
//! the terminating chunk and the two trailers are written.
//!
//! Chunks already written are never retracted: if the upstream fails midway the relay
//! stops and the client sees a body without a terminating chunk.

use http::StatusCode;
use http::header::{CONTENT_LENGTH, TRAILER, TRANSFER_ENCODING};
use sha2::{Digest, Sha256};
use std::fmt::Write;
use std::io;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tracing::{debug, error, info};

use crate::connection::ResponseWriter;
use crate::protocol::{HeaderError, SendError, default_headers};

/// Maximum number of bytes forwarded per chunk
pub const RELAY_BLOCK_SIZE: usize = 1024;

/// Trailer carrying the lower-case hex SHA-256 of the relayed body
pub const CONTENT_SHA256_TRAILER: &str = "X-Content-SHA256";

/// Trailer carrying the number of relayed body bytes
pub const CONTENT_LENGTH_TRAILER: &str = "X-Content-Length";

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("upstream read error: {source}")]
    Upstream { source: io::Error },

    #[error("response error: {source}")]
    Response {
        #[from]
        source: SendError,
    },

    #[error("trailer error: {source}")]
    Trailer {
        #[from]
        source: HeaderError,
    },
}

/// What was relayed, as reported in the trailers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySummary {
    pub bytes: u64,
    pub sha256: String,
}

/// Relays `upstream` through `writer` as a `200 OK` chunked response.
///
/// `writer` must still be at the status line.
///
/// # Errors
///
/// Returns [`RelayError::Upstream`] if reading the upstream fails, and
/// [`RelayError::Response`] if writing to the client fails.
pub async fn relay<R, W>(mut upstream: R, writer: &mut ResponseWriter<W>) -> Result<RelaySummary, RelayError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut headers = default_headers(0);
    headers.remove(CONTENT_LENGTH.as_str());
    headers.set(TRANSFER_ENCODING.as_str(), "chunked")?;
    headers.set(TRAILER.as_str(), CONTENT_SHA256_TRAILER)?;
    headers.set(TRAILER.as_str(), CONTENT_LENGTH_TRAILER)?;

    writer.write_status_line(StatusCode::OK).await?;
    writer.write_headers(&headers).await?;

    let mut hasher = Sha256::new();
    let mut total = 0u64;
    let mut block = [0u8; RELAY_BLOCK_SIZE];

    loop {
        let read = match upstream.read(&mut block).await {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) => {
                error!(cause = %e, relayed = total, "error reading upstream body, relay aborted");
                return Err(RelayError::Upstream { source: e });
            }
        };

        debug!(read, "relaying chunk");
        hasher.update(&block[..read]);
        total += read as u64;
        writer.write_chunked_chunk(&block[..read]).await?;
    }

    let summary = RelaySummary { bytes: total, sha256: to_hex(&hasher.finalize()) };

    writer.write_chunked_done().await?;
    headers.set(CONTENT_SHA256_TRAILER, &summary.sha256)?;
    headers.set(CONTENT_LENGTH_TRAILER, &summary.bytes.to_string())?;
    writer.write_trailers(&headers).await?;

    info!(bytes = summary.bytes, sha256 = %summary.sha256, "relay finished");
    Ok(summary)
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut hex, b| {
        let _ = write!(hex, "{b:02x}");
        hex
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::WriterState;
    use bytes::Bytes;
    use futures::stream;
    use tokio_util::io::StreamReader;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const HELLO_WORLD_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    fn split_wire(wire: &[u8]) -> (String, String) {
        let text = String::from_utf8(wire.to_vec()).unwrap();
        let (head, body) = text.split_once("\r\n\r\n").unwrap();
        (head.to_string(), body.to_string())
    }

    #[tokio::test]
    async fn relays_as_chunks_with_trailers() {
        let chunks = vec![Ok::<_, io::Error>(Bytes::from_static(b"hello")), Ok(Bytes::from_static(b" world"))];
        let upstream = StreamReader::new(stream::iter(chunks));
        let mut writer = ResponseWriter::new(Vec::new());

        let summary = relay(upstream, &mut writer).await.unwrap();

        assert_eq!(summary, RelaySummary { bytes: 11, sha256: HELLO_WORLD_SHA256.to_string() });
        assert_eq!(writer.state(), WriterState::Complete);

        let (head, body) = split_wire(&writer.into_inner());
        assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(head.contains("transfer-encoding: chunked"));
        assert!(head.contains("trailer: X-Content-SHA256, X-Content-Length"));
        assert!(!head.contains("content-length"));
        assert_eq!(
            body,
            format!("5\r\nhello\r\n6\r\n world\r\n0\r\nX-Content-SHA256: {HELLO_WORLD_SHA256}\r\nX-Content-Length: 11\r\n\r\n")
        );
    }

    #[tokio::test]
    async fn large_body_is_split_into_blocks() {
        let data = vec![b'z'; RELAY_BLOCK_SIZE * 2 + 10];
        let mut writer = ResponseWriter::new(Vec::new());

        let summary = relay(&data[..], &mut writer).await.unwrap();

        assert_eq!(summary.bytes, data.len() as u64);
        let (_, body) = split_wire(&writer.into_inner());
        assert_eq!(body.matches("400\r\n").count(), 2);
        assert!(body.contains("\r\na\r\nzzzzzzzzzz\r\n0\r\n"));
    }

    #[tokio::test]
    async fn empty_upstream() {
        let mut writer = ResponseWriter::new(Vec::new());

        let summary = relay(&b""[..], &mut writer).await.unwrap();

        assert_eq!(summary.sha256, EMPTY_SHA256);
        let (_, body) = split_wire(&writer.into_inner());
        assert_eq!(body, format!("0\r\nX-Content-SHA256: {EMPTY_SHA256}\r\nX-Content-Length: 0\r\n\r\n"));
    }

    #[tokio::test]
    async fn upstream_error_aborts_without_terminator() {
        let chunks = vec![Ok(Bytes::from_static(b"partial")), Err(io::Error::from(io::ErrorKind::ConnectionReset))];
        let upstream = StreamReader::new(stream::iter(chunks));
        let mut writer = ResponseWriter::new(Vec::new());

        let result = relay(upstream, &mut writer).await;

        assert!(matches!(result, Err(RelayError::Upstream { .. })));
        assert_eq!(writer.state(), WriterState::Body);
        let (_, body) = split_wire(&writer.into_inner());
        assert_eq!(body, "7\r\npartial\r\n");
    }

    #[test]
    fn hex_encoding() {
        assert_eq!(to_hex(&[0x00, 0x0f, 0xab, 0xff]), "000fabff");
        assert_eq!(to_hex(&[]), "");
    }
}
