//! HTTP transport: one [`RequestDescriptor`] in, one normalized outcome out.
//!
//! Responsibilities:
//! - Compose headers (JSON content type, bearer token, caller overrides)
//! - Bound every request by the configured timeout, cancelling the
//!   in-flight exchange when it elapses
//! - Clear the session on 401 and announce it
//! - Map every other outcome onto [`ApiError`]
//!
//! Does NOT retry, navigate, or interpret payloads.

use crate::backend::{BackendError, HttpBackend, OutgoingRequest, RawResponse, ReqwestBackend};
use crate::events::{ClearReason, SessionEvent, SessionEvents};
use agrochar_core::error::UNAUTHORIZED_STATUS;
use agrochar_core::{ApiError, ApiResult, ClientConfig, HttpMethod, RequestDescriptor, SessionStore};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const GENERIC_FAILURE: &str = "Request failed";
const UNAUTHORIZED_MESSAGE: &str = "Session expired, please log in again";
const NO_CONTENT_STATUS: u16 = 204;

/// How long a cancelled backend gets to wind down before it is abandoned.
const CANCEL_GRACE: Duration = Duration::from_millis(500);

pub struct HttpTransport {
    backend: Arc<dyn HttpBackend>,
    session: Arc<dyn SessionStore>,
    events: SessionEvents,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport using `reqwest` and the default timeout.
    pub fn new(base_url: impl Into<String>, session: Arc<dyn SessionStore>) -> Self {
        let defaults = ClientConfig::default();
        Self {
            backend: Arc::new(ReqwestBackend::new()),
            session,
            events: SessionEvents::new(),
            base_url: base_url.into(),
            timeout: defaults.timeout(),
        }
    }

    pub fn from_config(config: &ClientConfig, session: Arc<dyn SessionStore>) -> Self {
        Self::new(config.base_url.clone(), session).with_timeout(config.timeout())
    }

    /// Replaces the network backend.
    pub fn with_backend(mut self, backend: Arc<dyn HttpBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Shares an existing event hub instead of the transport's own.
    pub fn with_events(mut self, events: SessionEvents) -> Self {
        self.events = events;
        self
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issues the request and normalizes its outcome.
    pub async fn execute(&self, descriptor: RequestDescriptor) -> ApiResult<Value> {
        let request_id = Uuid::new_v4();
        let token = self.session.token();
        let outgoing = self.prepare(&descriptor, token.as_deref())?;

        tracing::debug!(
            %request_id,
            method = %descriptor.method,
            path = %descriptor.path,
            authenticated = outgoing.headers.contains_key("authorization"),
            "[Transport] Sending request"
        );

        let cancel = CancellationToken::new();
        let send = self.backend.send(outgoing, cancel.clone());
        tokio::pin!(send);

        let outcome = match tokio::time::timeout(self.timeout, &mut send).await {
            Ok(outcome) => outcome,
            Err(_) => {
                cancel.cancel();
                // Let the backend tear the exchange down; whatever it reports
                // now is irrelevant.
                if tokio::time::timeout(CANCEL_GRACE, send).await.is_err() {
                    tracing::warn!(%request_id, "[Transport] Backend ignored cancellation");
                }
                tracing::warn!(
                    %request_id,
                    path = %descriptor.path,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "[Transport] Request timed out"
                );
                return Err(ApiError::timeout());
            }
        };

        let raw = match outcome {
            Ok(raw) => raw,
            Err(BackendError::Cancelled) => return Err(ApiError::timeout()),
            Err(BackendError::Network(message)) => {
                tracing::debug!(%request_id, "[Transport] Network failure: {}", message);
                return Err(ApiError::network(message));
            }
        };

        tracing::debug!(%request_id, status = raw.status, "[Transport] Response received");

        if raw.status == UNAUTHORIZED_STATUS {
            return Err(self.handle_unauthorized(&descriptor, &raw));
        }

        normalize(raw)
    }

    pub async fn get(&self, path: impl Into<String>) -> ApiResult<Value> {
        self.execute(RequestDescriptor::get(path)).await
    }

    pub async fn post(&self, path: impl Into<String>, body: Option<Value>) -> ApiResult<Value> {
        self.execute(with_body(RequestDescriptor::post(path), body)).await
    }

    pub async fn put(&self, path: impl Into<String>, body: Option<Value>) -> ApiResult<Value> {
        self.execute(with_body(RequestDescriptor::new(HttpMethod::Put, path), body))
            .await
    }

    pub async fn delete(&self, path: impl Into<String>) -> ApiResult<Value> {
        self.execute(RequestDescriptor::new(HttpMethod::Delete, path))
            .await
    }

    fn prepare(&self, descriptor: &RequestDescriptor, token: Option<&str>) -> ApiResult<OutgoingRequest> {
        let body = descriptor
            .body
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| ApiError::decode(format!("Failed to encode request body: {}", e)))?;

        Ok(OutgoingRequest {
            method: descriptor.method,
            url: format!("{}{}", self.base_url.trim_end_matches('/'), descriptor.path),
            query: descriptor.query.clone(),
            headers: compose_headers(descriptor, token),
            body,
        })
    }

    fn handle_unauthorized(&self, descriptor: &RequestDescriptor, raw: &RawResponse) -> ApiError {
        tracing::warn!(
            path = %descriptor.path,
            "[Transport] Backend rejected credentials, clearing session"
        );

        if let Err(e) = self.session.clear() {
            tracing::error!("[Transport] Failed to clear session after 401: {}", e);
        }
        self.events.publish(SessionEvent::Cleared {
            reason: ClearReason::Unauthorized,
        });

        let body = decode_body(&raw.body).ok().filter(|b| !b.is_null());
        let message = body
            .as_ref()
            .and_then(detail_message)
            .unwrap_or_else(|| UNAUTHORIZED_MESSAGE.to_string());
        ApiError::unauthorized(message, body)
    }
}

fn with_body(descriptor: RequestDescriptor, body: Option<Value>) -> RequestDescriptor {
    match body {
        Some(body) => descriptor.body(body),
        None => descriptor,
    }
}

/// Builds the header set for a request.
///
/// Names are lower-cased so caller overrides replace defaults regardless of
/// the case they were written in.
pub(crate) fn compose_headers(
    descriptor: &RequestDescriptor,
    token: Option<&str>,
) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    if descriptor.body.is_some() {
        headers.insert("content-type".to_string(), "application/json".to_string());
    }

    if let Some(token) = token.filter(|t| !t.is_empty()) {
        headers.insert("authorization".to_string(), format!("Bearer {}", token));
    }

    for (name, value) in &descriptor.extra_headers {
        headers.insert(name.to_ascii_lowercase(), value.clone());
    }

    headers
}

fn decode_body(bytes: &[u8]) -> Result<Value, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Extracts the backend's `detail` field as display text.
fn detail_message(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        // Validation errors arrive as a list of objects
        structured => Some(structured.to_string()),
    }
}

/// Maps a non-401 response onto the success payload or an [`ApiError`].
pub(crate) fn normalize(raw: RawResponse) -> ApiResult<Value> {
    let status = raw.status;

    // 204 is the only answer allowed to carry no body
    if status == NO_CONTENT_STATUS && raw.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    let decoded = decode_body(&raw.body);

    if (200..300).contains(&status) {
        return decoded.map_err(|e| {
            ApiError::decode(format!("Invalid JSON in response: {}", e)).with_status(status)
        });
    }

    match decoded {
        Ok(body) => {
            let message = detail_message(&body).unwrap_or_else(|| GENERIC_FAILURE.to_string());
            let body = (!body.is_null()).then_some(body);
            Err(ApiError::http(status, message, body))
        }
        Err(e) => Err(
            ApiError::decode(format!("Invalid JSON in error response: {}", e)).with_status(status),
        ),
    }
}
