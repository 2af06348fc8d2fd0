//! Reqwest-backed gateway to the external orchestration service.
//!
//! The gateway owns transport details only: URL construction, correlation
//! headers, timeout, envelope unwrapping and HTTP error mapping. Capability
//! adapters describe each call with a [`ServiceCall`].

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::ports::define_port_error;
use crate::domain::{CallerIdentity, Error, REQUEST_ID_HEADER, RequestId, ServiceOutcome};

/// Header carrying the resolved caller identity on outbound calls.
pub const USER_ID_HEADER: &str = "x-user-id";

define_port_error! {
    /// Failures raised while talking to the external service.
    pub enum ServiceGatewayError {
        /// The call could not be turned into a valid URL.
        Misconfigured { message: String } => "service gateway misconfigured: {message}",
        /// The request timed out.
        Timeout { message: String } => "service request timed out: {message}",
        /// The service could not be reached.
        Transport { message: String } => "service unreachable: {message}",
        /// The response body was not valid JSON.
        Decode { message: String } => "malformed service response: {message}",
        /// The service answered with an error.
        Upstream { status: u16, code: Option<String>, message: String } =>
            "service returned {status}: {message}",
    }
}

impl ServiceGatewayError {
    /// Map into a domain error, using `reason` as the client-facing code
    /// unless the service supplied its own.
    #[must_use]
    pub fn into_domain(self, reason: &str) -> Error {
        match self {
            Self::Misconfigured { message } => {
                Error::internal(format!("service gateway misconfigured: {message}"))
            }
            Self::Timeout { .. } => {
                Error::bad_gateway("service request timed out").with_reason(reason)
            }
            Self::Transport { .. } => Error::bad_gateway("service unreachable").with_reason(reason),
            Self::Decode { .. } => {
                Error::bad_gateway("malformed service response").with_reason(reason)
            }
            Self::Upstream {
                status,
                code,
                message,
            } => Error::bad_gateway(message)
                .with_reason(code.unwrap_or_else(|| reason.to_owned()))
                .with_upstream_status(status),
        }
    }
}

/// One outbound call: method, `/v1/...` path, optional query and body, and
/// the reason code reported when the call fails.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCall {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    body: Option<Value>,
    reason: &'static str,
}

impl ServiceCall {
    /// Describe a call to `path` under the service base URL.
    pub fn new(method: Method, path: impl Into<String>, reason: &'static str) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            reason,
        }
    }

    /// Append a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    /// Returns an internal error when `body` cannot be serialised.
    pub fn with_body<B: Serialize>(mut self, body: &B) -> Result<Self, Error> {
        let value = serde_json::to_value(body)
            .map_err(|err| Error::internal(format!("failed to encode service request: {err}")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Reason code reported on failure.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

/// HTTP client for the external service.
#[derive(Debug, Clone)]
pub struct ServiceGateway {
    client: Client,
    base_url: Url,
}

impl ServiceGateway {
    /// Build a gateway using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Send `call` on behalf of `caller` and map failures to domain errors.
    pub async fn forward(
        &self,
        call: ServiceCall,
        caller: &CallerIdentity,
    ) -> Result<ServiceOutcome, Error> {
        let reason = call.reason();
        self.send(&call, caller).await.map_err(|err| {
            warn!(
                error = %err,
                kind = err.kind(),
                method = %call.method,
                path = %call.path,
                reason,
                "service call failed"
            );
            err.into_domain(reason)
        })
    }

    /// Send `call` and decode the reply.
    ///
    /// # Errors
    /// Returns [`ServiceGatewayError`] for transport failures, undecodable
    /// replies and error statuses.
    pub async fn send(
        &self,
        call: &ServiceCall,
        caller: &CallerIdentity,
    ) -> Result<ServiceOutcome, ServiceGatewayError> {
        let url = self.endpoint(call)?;
        let request_id = RequestId::current_or_generate();
        debug!(method = %call.method, %url, "forwarding to service");

        let mut request = self
            .client
            .request(call.method.clone(), url)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .header(USER_ID_HEADER, caller.as_str())
            .header(ACCEPT, "application/json");
        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        decode_success(status, body.as_ref())
    }

    fn endpoint(&self, call: &ServiceCall) -> Result<Url, ServiceGatewayError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{}", call.path))
            .map_err(|err| ServiceGatewayError::misconfigured(err.to_string()))?;
        if !call.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(call.query.iter().map(|(key, value)| (*key, value.as_str())));
        }
        Ok(url)
    }
}

fn map_transport_error(error: reqwest::Error) -> ServiceGatewayError {
    if error.is_timeout() {
        ServiceGatewayError::timeout(error.to_string())
    } else if error.is_decode() {
        ServiceGatewayError::decode(error.to_string())
    } else {
        ServiceGatewayError::transport(error.to_string())
    }
}

/// A JSON object is treated as an envelope when it carries `data` or
/// `error` and no keys besides `data`, `error` and `meta`.
fn as_envelope(value: &Value) -> Option<&Map<String, Value>> {
    value.as_object().filter(|object| {
        (object.contains_key("data") || object.contains_key("error"))
            && object
                .keys()
                .all(|key| matches!(key.as_str(), "data" | "error" | "meta"))
    })
}

fn envelope_error(error: &Value) -> Option<(Option<String>, Option<String>)> {
    let error = error.as_object()?;
    let code = error.get("code").and_then(Value::as_str).map(str::to_owned);
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_owned);
    Some((code, message))
}

fn decode_success(status: StatusCode, body: &[u8]) -> Result<ServiceOutcome, ServiceGatewayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ServiceOutcome::with_status(status.as_u16(), Value::Null).into_renderable());
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| ServiceGatewayError::decode(format!("invalid JSON payload: {err}")))?;
    let Some(envelope) = as_envelope(&value) else {
        return Ok(ServiceOutcome::with_status(status.as_u16(), value));
    };

    if let Some((code, message)) = envelope.get("error").and_then(envelope_error) {
        return Err(ServiceGatewayError::upstream(
            StatusCode::BAD_GATEWAY.as_u16(),
            code,
            message.unwrap_or_else(|| "service reported an error".to_owned()),
        ));
    }
    let data = envelope.get("data").cloned().unwrap_or(Value::Null);
    let meta = envelope
        .get("meta")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    Ok(ServiceOutcome {
        status: status.as_u16(),
        data,
        meta,
    }
    .into_renderable())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ServiceGatewayError {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    let (code, message) = parsed
        .as_ref()
        .and_then(|value| match as_envelope(value) {
            Some(envelope) => envelope.get("error").and_then(envelope_error),
            None => envelope_error(value),
        })
        .unwrap_or((None, None));
    let message = message.unwrap_or_else(|| {
        let preview = body_preview(body);
        if preview.is_empty() {
            format!("status {}", status.as_u16())
        } else {
            preview
        }
    });
    ServiceGatewayError::upstream(status.as_u16(), code, message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
