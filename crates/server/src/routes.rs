use futures::TryStreamExt;
use http::StatusCode;
use http::header::CONTENT_TYPE;
use std::io;
use tokio::io::AsyncWrite;
use tokio_util::io::StreamReader;
use tracing::{error, info};
use wire_http::connection::ResponseWriter;
use wire_http::handler::{Handler, HandlerError};
use wire_http::protocol::{Request, default_headers};
use wire_http::relay::relay;

const PROXY_PREFIX: &str = "/httpbin";

const OK_PAGE: &str = "<html>
<head>
<title>200 OK</title>
</head>
<body>
<h1>Success!</h1>
<p>Your request was an absolute banger.</p>
</body>
</html>
";

const BAD_REQUEST_PAGE: &str = "<html>
<head>
<title>400 Bad Request</title>
</head>
<body>
<h1>Bad Request</h1>
<p>Your request honestly kinda sucked.</p>
</body>
</html>
";

const INTERNAL_ERROR_PAGE: &str = "<html>
<head>
<title>500 Internal Server Error</title>
</head>
<body>
<h1>Internal Server Error</h1>
<p>Okay, you know what? This one is on me.</p>
</body>
</html>
";

/// Demo routes.
///
/// - `/httpbin/...` is relayed from the upstream with integrity trailers
/// - `/yourproblem` answers 400
/// - `/myproblem` answers 500
/// - everything else answers 200
#[derive(Debug)]
pub struct Routes {
    client: reqwest::Client,
    upstream: String,
}

impl Routes {
    pub fn new(upstream: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), upstream: upstream.into().trim_end_matches('/').to_string() }
    }

    async fn proxy<W>(&self, path: &str, writer: &mut ResponseWriter<W>) -> Result<(), HandlerError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let url = format!("{}{path}", self.upstream);
        info!(%url, "proxying");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(cause = %e, %url, "upstream request failed");
                return html_page(writer, StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_PAGE).await;
            }
        };

        let body = StreamReader::new(response.bytes_stream().map_err(io::Error::other));
        let summary = relay(body, writer).await?;
        info!(%url, bytes = summary.bytes, "proxied");
        Ok(())
    }
}

impl<W> Handler<W> for Routes
where
    W: AsyncWrite + Unpin + Send,
{
    async fn call(&self, request: Request, writer: &mut ResponseWriter<W>) -> Result<(), HandlerError> {
        let target = request.target();

        if let Some(path) = target.strip_prefix(PROXY_PREFIX) {
            return self.proxy(path, writer).await;
        }

        match target {
            "/yourproblem" => html_page(writer, StatusCode::BAD_REQUEST, BAD_REQUEST_PAGE).await,
            "/myproblem" => html_page(writer, StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_PAGE).await,
            _ => html_page(writer, StatusCode::OK, OK_PAGE).await,
        }
    }
}

async fn html_page<W>(writer: &mut ResponseWriter<W>, status: StatusCode, page: &str) -> Result<(), HandlerError>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut headers = default_headers(page.len());
    headers.override_value(CONTENT_TYPE.as_str(), mime::TEXT_HTML.as_ref())?;

    writer.write_status_line(status).await?;
    writer.write_headers(&headers).await?;
    writer.write_body(page.as_bytes()).await?;
    Ok(())
}
