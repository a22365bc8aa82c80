//! Request and response contexts handed to controllers.

use std::collections::HashMap;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};

use crate::controller::ControllerError;
use crate::http::response::found;

/// Everything a controller gets to see about the incoming request.
#[derive(Debug, Clone)]
pub struct ControllerRequest {
    pub method: Method,
    pub uri: Uri,
    /// Route pattern the request matched, as registered.
    pub route: String,
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    pub raw_body: Bytes,
    /// Body decoded from JSON or URL-encoded form data.
    pub body: Option<serde_json::Value>,
}

impl ControllerRequest {
    pub fn new(method: Method, uri: Uri) -> Self {
        let query = uri.query().map(parse_query).unwrap_or_default();
        Self {
            method,
            uri,
            route: String::new(),
            params: HashMap::new(),
            query,
            headers: HeaderMap::new(),
            raw_body: Bytes::new(),
            body: None,
        }
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = route.into();
        self
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Attach the raw body and decode it according to the content type.
    pub fn with_body(mut self, raw_body: Bytes) -> Self {
        self.body = decode_body(&self.headers, &raw_body);
        self.raw_body = raw_body;
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// True when the caller asked for JSON, via `Accept` or `?format=json`.
    pub fn wants_json(&self) -> bool {
        if self.query("format") == Some("json") {
            return true;
        }
        self.header(header::ACCEPT.as_str())
            .map(|accept| accept.contains("application/json") && !accept.contains("text/html"))
            .unwrap_or(false)
    }
}

fn parse_query(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes()).into_owned().collect()
}

fn decode_body(headers: &HeaderMap, raw: &Bytes) -> Option<serde_json::Value> {
    if raw.is_empty() {
        return None;
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("application/json") {
        serde_json::from_slice(raw).ok()
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let fields: serde_json::Map<String, serde_json::Value> = url::form_urlencoded::parse(raw)
            .into_owned()
            .map(|(k, v)| (k, serde_json::Value::String(v)))
            .collect();
        Some(serde_json::Value::Object(fields))
    } else {
        None
    }
}

/// Response slot a controller may write to directly.
///
/// At most one response can be committed; the dispatcher checks
/// [`ResponseContext::is_committed`] once the controller returns.
#[derive(Debug, Default)]
pub struct ResponseContext {
    committed: Option<Response>,
}

impl ResponseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_committed(&self) -> bool {
        self.committed.is_some()
    }

    /// Commit a complete response.
    pub fn commit(&mut self, response: impl IntoResponse) -> Result<(), ControllerError> {
        if self.committed.is_some() {
            return Err(ControllerError::AlreadyCommitted);
        }
        self.committed = Some(response.into_response());
        Ok(())
    }

    pub fn json(&mut self, status: StatusCode, value: serde_json::Value) -> Result<(), ControllerError> {
        self.commit((status, Json(value)))
    }

    pub fn html(&mut self, status: StatusCode, content: impl Into<String>) -> Result<(), ControllerError> {
        self.commit((
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"))],
            Body::from(content.into()),
        ))
    }

    /// Commit a 302 redirect.
    pub fn redirect(&mut self, url: &str) -> Result<(), ControllerError> {
        let response = found(url).map_err(|e| ControllerError::Failed(format!("invalid redirect url {url:?}: {e}")))?;
        self.commit(response)
    }

    pub fn status(&mut self, status: StatusCode) -> Result<(), ControllerError> {
        self.commit(status)
    }

    /// Take the committed response, leaving the context empty.
    pub fn take(&mut self) -> Option<Response> {
        self.committed.take()
    }
}
