use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use remote_decode::{decode::masked_checksum, server};
use serde_json::Value;
use snap::write::FrameEncoder;
use std::io::Write;
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

use super::mocks::RecordingSink;

/// Caller string BigQuery sends for a query job
pub const TEST_CALLER: &str =
    "//bigquery.googleapis.com/projects/myproject/jobs/myproject:US.bquxjob_5b4c112c_17961fafeaf";

/// S2-framed payloads produced by the Go S2 writer, holding "a" and "v"
pub const S2_PAYLOAD_A: &str = "/wYAAFMyc1R3TwEFAAB4buQoYQ==";
pub const S2_PAYLOAD_V: &str = "/wYAAFMyc1R3TwEFAABh9epjdg==";

/// Compress with the snappy frame format and base64 encode the result
pub fn encode_payload(text: &str) -> String {
    let mut encoder = FrameEncoder::new(Vec::new());
    encoder.write_all(text.as_bytes()).unwrap();
    STANDARD.encode(encoder.into_inner().unwrap())
}

/// Frame a compressed S2 block together with the text it decodes to
pub fn s2_compressed_chunk(block: &[u8], decoded: &[u8]) -> Vec<u8> {
    s2_chunk(0x00, block, decoded)
}

/// Frame uncompressed data as an S2 chunk
pub fn s2_uncompressed_chunk(data: &[u8]) -> Vec<u8> {
    s2_chunk(0x01, data, data)
}

fn s2_chunk(chunk_type: u8, body: &[u8], decoded: &[u8]) -> Vec<u8> {
    let len = (body.len() + 4) as u32;
    let mut chunk = vec![chunk_type];
    chunk.extend_from_slice(&len.to_le_bytes()[..3]);
    chunk.extend_from_slice(&masked_checksum(decoded).to_le_bytes());
    chunk.extend_from_slice(body);
    chunk
}

/// Prefix chunks with the S2 stream identifier and base64 encode the stream
pub fn s2_payload(chunks: &[Vec<u8>]) -> String {
    let mut stream = b"\xff\x06\x00\x00S2sTwO".to_vec();
    for chunk in chunks {
        stream.extend_from_slice(chunk);
    }
    STANDARD.encode(stream)
}

/// Build a request body in the shape BigQuery sends
pub fn request_body(calls: Vec<Vec<String>>) -> Value {
    serde_json::json!({
        "requestId": "124ab1c",
        "caller": TEST_CALLER,
        "sessionUser": "test-user@test-company.com",
        "userDefinedContext": {"key1": "value1"},
        "calls": calls,
    })
}

/// Build a router that logs into a recording sink
pub fn create_test_app() -> (Router, RecordingSink) {
    let sink = RecordingSink::new();
    let app = server::router(Arc::new(sink.clone()), 1024 * 1024);
    (app, sink)
}

pub async fn post(app: Router, body: impl Into<Body>) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();

    app.oneshot(request).await.unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
