use super::types::{DecodeRequest, DecodeResponse};
use crate::{
    Error, Result, decode,
    logging::{EventSink, HttpRequestInfo, LogEntry},
};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, Uri, Version, header},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub log: Arc<dyn EventSink>,
}

impl AppState {
    pub fn new(log: Arc<dyn EventSink>) -> Self {
        Self { log }
    }
}

pub async fn decode_batch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let request: DecodeRequest = serde_json::from_slice(&body).map_err(Error::InvalidRequest)?;
    let http_request = HttpRequestInfo::from_parts(&method, &uri, version, &headers);

    let request_id = if request.request_id.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        request.request_id
    };
    debug!(
        "Decoding request {} for session user {}",
        request_id, request.session_user
    );

    state.log.log(
        LogEntry::info("processing request")
            .with_http_request(http_request.clone())
            .with_label("caller", request.caller.as_str())
            .with_label("length", request.calls.len().to_string()),
    );

    let replies = decode::decode_calls(&request.calls)?;

    let body = serde_json::to_vec(&DecodeResponse { replies }).map_err(|e| {
        state
            .log
            .log(LogEntry::error("unable to encode json").with_http_request(http_request));
        Error::Encode(e)
    })?;

    debug!("Decoded {} calls for request {}", request.calls.len(), request_id);

    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

pub async fn health() -> &'static str {
    "ok"
}
