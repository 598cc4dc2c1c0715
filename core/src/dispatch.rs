//! The request dispatcher shared by every resource module.
//!
//! # Design
//! `Dispatcher` holds the base URL, the API key and a `Transport`, none of
//! which change after construction, so it can be shared across threads
//! without locking. A dispatch is split into three steps:
//!
//! 1. `build_request` turns a `RequestSpec` into an `HttpRequest` (URL,
//!    auth and content headers, JSON body).
//! 2. The transport executes it exactly once. Nothing is retried here.
//! 3. `parse_response` normalizes the outcome into a JSON value or one of
//!    the `PanelError` kinds.
//!
//! Steps 1 and 3 are pure, so request shape and error mapping are testable
//! without a network.
//!
//! The payload is sent as given for every verb. The panel uses bodies on
//! DELETE to identify the target (unban, remove from whitelist), so the
//! dispatcher never drops one.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::config::{ApiKey, PanelConfig};
use crate::error::PanelError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};

const JSON: &str = "application/json";

/// One unit of work for the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    /// Path relative to the panel base URL, e.g. `client/servers/abc123/mc-players`.
    pub endpoint: String,
    pub payload: Option<Value>,
    pub query: Vec<(String, String)>,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            payload: None,
            query: Vec::new(),
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    pub fn with_payload<B: Serialize + ?Sized>(mut self, payload: &B) -> Result<Self, PanelError> {
        self.payload = Some(serde_json::to_value(payload).map_err(PanelError::Encode)?);
        Ok(self)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

/// Sends `RequestSpec`s to one panel with one API key.
#[derive(Debug)]
pub struct Dispatcher<T = UreqTransport> {
    base_url: String,
    api_key: ApiKey,
    user_agent: String,
    transport: T,
}

impl Dispatcher<UreqTransport> {
    pub fn new(config: &PanelConfig) -> Self {
        Self::with_transport(config, UreqTransport::new(config.timeout()))
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn with_transport(config: &PanelConfig, transport: T) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            api_key: config.api_key().clone(),
            user_agent: config.user_agent().to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `spec` once and returns the decoded body.
    ///
    /// A 2xx response with an empty body yields an empty JSON object.
    pub fn dispatch(&self, spec: &RequestSpec) -> Result<Value, PanelError> {
        self.send(spec).map(|(_, value)| value)
    }

    /// Like `dispatch`, decoding the body into `R`. A body that does not fit
    /// `R` is reported as `Decode` with the status the panel answered with.
    pub fn dispatch_as<R: DeserializeOwned>(&self, spec: &RequestSpec) -> Result<R, PanelError> {
        let (status, value) = self.send(spec)?;
        serde_json::from_value(value).map_err(|source| {
            error!("{} {}: response does not match expected shape: {}", spec.method, spec.endpoint, source);
            PanelError::Decode { status, source }
        })
    }

    pub fn build_request(&self, spec: &RequestSpec) -> Result<HttpRequest, PanelError> {
        let body = spec
            .payload
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(PanelError::Encode)?;

        Ok(HttpRequest {
            method: spec.method,
            url: self.url_for(&spec.endpoint, &spec.query),
            headers: vec![
                ("Authorization".to_string(), self.api_key.bearer()),
                ("Accept".to_string(), JSON.to_string()),
                ("Content-Type".to_string(), JSON.to_string()),
                ("User-Agent".to_string(), self.user_agent.clone()),
            ],
            body,
        })
    }

    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, PanelError> {
        parse_response(response)
    }

    fn send(&self, spec: &RequestSpec) -> Result<(u16, Value), PanelError> {
        let request = self.build_request(spec)?;
        debug!("{} {}", request.method, request.url);

        let response = self.transport.execute(&request).map_err(|e| {
            warn!("{} {} did not complete: {}", request.method, request.url, e);
            PanelError::from(e)
        })?;
        let status = response.status;
        debug!("{} {} -> {}", request.method, request.url, status);

        Ok((status, parse_response(response)?))
    }

    fn url_for(&self, endpoint: &str, query: &[(String, String)]) -> String {
        let mut url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        if !query.is_empty() {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query)
                .finish();
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&encoded);
        }
        url
    }
}

/// Map a raw response onto the success value or an error kind.
fn parse_response(response: HttpResponse) -> Result<Value, PanelError> {
    let status = response.status;
    if !response.is_success() {
        let body = error_body(&String::from_utf8_lossy(&response.body));
        warn!("panel rejected request with HTTP {status}: {body}");
        return Err(PanelError::Api { status, body });
    }
    if response.body.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Value::Object(Map::new()));
    }
    // Bytes that are not UTF-8 fail here too.
    serde_json::from_slice(&response.body).map_err(|source| {
        error!("HTTP {status} response is not valid JSON: {source}");
        PanelError::Decode { status, source }
    })
}

fn error_body(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
