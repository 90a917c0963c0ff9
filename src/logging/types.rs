use axum::http::{HeaderMap, Method, Uri, Version, header};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

/// The parts of an incoming HTTP request that are attached to log entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequestInfo {
    pub request_method: String,
    pub request_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_size: Option<u64>,
    pub protocol: String,
}

impl HttpRequestInfo {
    pub fn from_parts(method: &Method, uri: &Uri, version: Version, headers: &HeaderMap) -> Self {
        let header_str = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        Self {
            request_method: method.to_string(),
            request_url: uri.to_string(),
            user_agent: header_str(header::USER_AGENT),
            referer: header_str(header::REFERER),
            request_size: header_str(header::CONTENT_LENGTH).and_then(|v| v.parse().ok()),
            protocol: format!("{:?}", version),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_request: Option<HttpRequestInfo>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    pub payload: String,
}

impl LogEntry {
    pub fn new(severity: Severity, payload: impl Into<String>) -> Self {
        Self {
            severity,
            http_request: None,
            labels: BTreeMap::new(),
            payload: payload.into(),
        }
    }

    pub fn info(payload: impl Into<String>) -> Self {
        Self::new(Severity::Info, payload)
    }

    pub fn error(payload: impl Into<String>) -> Self {
        Self::new(Severity::Error, payload)
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_http_request(mut self, request: HttpRequestInfo) -> Self {
        self.http_request = Some(request);
        self
    }
}
