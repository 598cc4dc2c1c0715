//! The I/O boundary between the dispatcher and the network.
//!
//! # Design
//! `Transport` is the only seam that performs a round-trip. Implementations
//! must report non-2xx statuses as ordinary `HttpResponse` values and reserve
//! `TransportError` for failures where no complete response was received.
//! `UreqTransport` is the blocking default used by `Dispatcher::new`.

use std::time::Duration;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one `HttpRequest` and returns the panel's response as data.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Largest response body `UreqTransport` reads by default: 64 MiB.
pub const DEFAULT_BODY_LIMIT: u64 = 64 * 1024 * 1024;

/// Blocking transport backed by a shared `ureq::Agent`.
///
/// The agent keeps its own connection pool; status codes are never turned
/// into errors so the dispatcher sees every panel response. Bodies are read
/// as raw bytes up to `body_limit` (`DEFAULT_BODY_LIMIT` unless changed with
/// `with_body_limit`). A body over the limit is not received in full and
/// fails as a `TransportError`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    body_limit: u64,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self {
            agent,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn with_body_limit(mut self, bytes: u64) -> Self {
        self.body_limit = bytes;
        self
    }

    pub fn body_limit(&self) -> u64 {
        self.body_limit
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let headers = &request.headers;
        let body = request.body.as_deref().map(str::as_bytes);

        // GET and DELETE only carry a body when the caller supplied one.
        let result = match (request.method, body) {
            (HttpMethod::Get, None) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Get, Some(bytes)) => {
                with_headers(self.agent.get(url), headers).force_send_body().send(bytes)
            }
            (HttpMethod::Delete, None) => with_headers(self.agent.delete(url), headers).call(),
            (HttpMethod::Delete, Some(bytes)) => {
                with_headers(self.agent.delete(url), headers).force_send_body().send(bytes)
            }
            (HttpMethod::Post, Some(bytes)) => with_headers(self.agent.post(url), headers).send(bytes),
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Put, Some(bytes)) => with_headers(self.agent.put(url), headers).send(bytes),
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
            (HttpMethod::Patch, Some(bytes)) => {
                with_headers(self.agent.patch(url), headers).send(bytes)
            }
            (HttpMethod::Patch, None) => with_headers(self.agent.patch(url), headers).send_empty(),
        };

        let mut response = result.map_err(|e| {
            TransportError::with_source(format!("{} {} failed: {e}", request.method, url), e)
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.body_limit)
            .read_to_vec()
            .map_err(|e| {
                TransportError::with_source(format!("reading response body from {url} failed: {e}"), e)
            })?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
