use std::sync::Arc;

use http::StatusCode;
use http::header::{CONTENT_LENGTH, TRANSFER_ENCODING};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, error, info, warn};

use crate::codec::RequestReader;
use crate::connection::{ConnectionConfig, ResponseWriter, WriterState};
use crate::handler::Handler;
use crate::protocol::{HttpError, ParseError, SendError, default_headers};

/// A single HTTP/1.1 exchange over a byte stream
///
/// `HttpConnection` reads exactly one request head, hands it to a [`Handler`] together
/// with a [`ResponseWriter`] bound to the same stream, and closes the write side when
/// the handler returns. There is no keep-alive and no pipelining.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    reader: RequestReader<R>,
    writer: ResponseWriter<W>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_config(reader, writer, &ConnectionConfig::default())
    }

    pub fn with_config(reader: R, writer: W, config: &ConnectionConfig) -> Self {
        Self {
            reader: RequestReader::with_capacity(reader, config.initial_buffer_size, config.max_head_size),
            writer: ResponseWriter::new(writer),
        }
    }

    /// Reads the request, runs `handler` and shuts the write side down.
    ///
    /// A request that can't be parsed is answered with `400 Bad Request` describing the
    /// error, and the parse error is returned. A handler failure is answered with
    /// `500 Internal Server Error` if nothing was written yet and is not returned.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler<W>,
    {
        let result = self.do_process(handler.as_ref()).await;

        if let Err(e) = self.writer.shutdown().await {
            warn!(cause = %e, "failed to shutdown connection");
        }

        result
    }

    async fn do_process<H>(&mut self, handler: &H) -> Result<(), HttpError>
    where
        H: Handler<W>,
    {
        let request = match self.reader.read_request().await {
            Ok(request) => request,
            Err(e) => {
                error!("can't receive request, cause {}", e);
                if !matches!(e, ParseError::Io { .. }) {
                    let body = format!("Error parsing request: {e}");
                    self.send_plain_response(StatusCode::BAD_REQUEST, body.as_bytes()).await?;
                }
                return Err(e.into());
            }
        };

        info!(method = %request.method(), target = request.target(), "received request");
        let headers = request.headers();
        if headers.contains(CONTENT_LENGTH.as_str()) || headers.contains(TRANSFER_ENCODING.as_str()) {
            debug!(buffered = self.reader.buffered().len(), "request body is not read");
        }

        if let Err(e) = handler.call(request, &mut self.writer).await {
            error!("handle response error, cause: {}", e);
            if self.writer.state() == WriterState::StatusLine {
                self.send_plain_response(StatusCode::INTERNAL_SERVER_ERROR, b"Internal Server Error").await?;
            } else {
                warn!(state = %self.writer.state(), "handler failed after the response was started");
            }
        }

        Ok(())
    }

    async fn send_plain_response(&mut self, status: StatusCode, body: &[u8]) -> Result<(), SendError> {
        self.writer.write_status_line(status).await?;
        self.writer.write_headers(&default_headers(body.len())).await?;
        self.writer.write_body(body).await?;
        Ok(())
    }
}
