use criterion::{Criterion, criterion_group, criterion_main};
use http::StatusCode;
use std::hint::black_box;
use std::sync::Arc;
use tokio::io::AsyncWrite;
use tokio::runtime::Runtime;
use wire_http::codec::{RequestDecoder, RequestReader};
use wire_http::connection::{HttpConnection, ResponseWriter};
use wire_http::handler::{Handler, HandlerError};
use wire_http::protocol::{HeaderCollection, Request, default_headers};
use wire_http::relay::relay;

const REQUEST: &[u8] = b"GET /coffee HTTP/1.1\r\nHost: localhost:42069\r\nUser-Agent: curl/7.81.0\r\nAccept: */*\r\n\r\n";

struct HelloWorld;

impl<W: AsyncWrite + Unpin + Send> Handler<W> for HelloWorld {
    async fn call(&self, _request: Request, writer: &mut ResponseWriter<W>) -> Result<(), HandlerError> {
        let body = b"Hello World!";
        writer.write_status_line(StatusCode::OK).await?;
        writer.write_headers(&default_headers(body.len())).await?;
        writer.write_body(body).await?;
        Ok(())
    }
}

fn bench_request_decoder(c: &mut Criterion) {
    c.bench_function("decode_simple_request", |b| {
        b.iter(|| {
            let mut decoder = RequestDecoder::new();
            black_box(decoder.parse(REQUEST).unwrap());
            black_box(decoder.take_request().unwrap());
        });
    });
}

fn bench_request_reader(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();

    c.bench_function("read_request_small_buffer", |b| {
        b.to_async(&runtime).iter(|| async {
            let mut reader = RequestReader::with_capacity(REQUEST, 8, 8 * 1024);
            black_box(reader.read_request().await.unwrap());
        });
    });
}

fn bench_chunked_response(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let chunk = vec![b'x'; 512];
    let mut headers = HeaderCollection::new();
    headers.set("Transfer-Encoding", "chunked").unwrap();
    headers.set("Trailer", "X-Checksum").unwrap();
    headers.set("X-Checksum", "deadbeef").unwrap();

    c.bench_function("write_chunked_response", |b| {
        b.to_async(&runtime).iter(|| async {
            let mut writer = ResponseWriter::new(Vec::with_capacity(8 * 1024));
            writer.write_status_line(StatusCode::OK).await.unwrap();
            writer.write_headers(&headers).await.unwrap();
            for _ in 0..8 {
                writer.write_chunked_chunk(&chunk).await.unwrap();
            }
            writer.write_chunked_done().await.unwrap();
            writer.write_trailers(&headers).await.unwrap();
            black_box(writer.into_inner());
        });
    });
}

fn bench_relay(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let upstream = vec![b'r'; 64 * 1024];

    c.bench_function("relay_64k", |b| {
        b.to_async(&runtime).iter(|| async {
            let mut writer = ResponseWriter::new(Vec::with_capacity(80 * 1024));
            black_box(relay(&upstream[..], &mut writer).await.unwrap());
        });
    });
}

fn bench_http_connection(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let handler = Arc::new(HelloWorld);

    c.bench_function("process_simple_request", |b| {
        b.to_async(&runtime).iter(|| async {
            let connection = HttpConnection::new(REQUEST, Vec::new());
            black_box(connection.process(Arc::clone(&handler)).await.unwrap());
        });
    });
}

criterion_group!(benches, bench_request_decoder, bench_request_reader, bench_chunked_response, bench_relay, bench_http_connection);
criterion_main!(benches);
