//! The network seam.
//!
//! [`HttpBackend`] performs exactly one exchange and reports either the raw
//! status and body or why no response arrived. It knows nothing about
//! sessions, JSON or error taxonomy; that is the transport's job.

use agrochar_core::HttpMethod;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

/// A fully resolved request, ready for the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    /// Lower-cased header names.
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The cancellation token fired before the exchange completed.
    Cancelled,
    /// No response: connection refused, DNS failure, broken stream...
    Network(String),
}

#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Performs the exchange.
    ///
    /// Implementations must stop work and return [`BackendError::Cancelled`]
    /// promptly once `cancel` fires.
    async fn send(
        &self,
        request: OutgoingRequest,
        cancel: CancellationToken,
    ) -> Result<RawResponse, BackendError>;
}

/// [`HttpBackend`] over a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestBackend {
    client: Client,
}

impl ReqwestBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn send(
        &self,
        request: OutgoingRequest,
        cancel: CancellationToken,
    ) -> Result<RawResponse, BackendError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let exchange = async move {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(RawResponse {
                status,
                body: body.to_vec(),
            })
        };

        // Dropping `exchange` aborts the underlying connection
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(BackendError::Cancelled),
            result = exchange => result.map_err(|e| BackendError::Network(e.to_string())),
        }
    }
}
