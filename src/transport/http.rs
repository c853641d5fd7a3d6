//! HTTP transport backed by reqwest

use std::task::{Context, Poll};

use async_trait::async_trait;

use crate::protocol::EventfulError;

use super::{Transport, TransportRequest, TransportResponse};

/// Default `User-Agent` sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("eventful-api-rust/", env!("CARGO_PKG_VERSION"));

/// HTTP transport implementation using reqwest
///
/// Clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a new HTTP transport with a default reqwest client
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a new HTTP transport with a custom reqwest client
    ///
    /// Use this to set timeouts, proxies or TLS options.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), EventfulError>> {
        // HTTP client is always ready
        Poll::Ready(Ok(()))
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, EventfulError> {
        let mut req_builder = match request.method.as_str() {
            "POST" => self.client.post(&request.url),
            "GET" => self.client.get(&request.url),
            _ => {
                return Err(EventfulError::Transport(format!(
                    "Unsupported HTTP method: {}",
                    request.method
                )))
            }
        };

        for (key, value) in request.headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.body.is_empty() {
            req_builder = req_builder.body(request.body);
        }

        let response = req_builder.send().await?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body = response.bytes().await?;

        Ok(TransportResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            headers,
            body,
        })
    }
}
