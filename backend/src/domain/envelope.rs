//! Uniform response envelope shared by every API endpoint.
//!
//! The same shape is produced for local responses and recognised when
//! decoding replies from the external service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Error, ErrorCode, RequestId};

/// Error body carried by a failed envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeError {
    /// Machine-readable code (category or handler-specific reason).
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Optional structured details, e.g. the failing field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Envelope metadata.
///
/// `requestId` is always set on envelopes this service originates. Extra
/// fields relayed from the external service are flattened alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeMeta {
    /// Correlation identifier for the request.
    pub request_id: String,
    /// Name of the provider that produced the payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Additional metadata relayed verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EnvelopeMeta {
    /// Metadata for the request currently in scope.
    #[must_use]
    pub fn current() -> Self {
        Self::for_request(RequestId::current_or_generate().to_string())
    }

    /// Metadata for an explicit request id.
    #[must_use]
    pub fn for_request(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            provider: None,
            extra: Map::new(),
        }
    }

    /// Set the provider name.
    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Merge relayed metadata. Our `requestId` always wins; a string
    /// `provider` populates the typed field.
    #[must_use]
    pub fn merged(mut self, relayed: Map<String, Value>) -> Self {
        for (key, value) in relayed {
            match (key.as_str(), value) {
                ("requestId", _) => {}
                ("provider", Value::String(provider)) => self.provider = Some(provider),
                (_, value) => {
                    self.extra.insert(key, value);
                }
            }
        }
        self
    }
}

/// `{ data, error, meta }` wrapper returned by every endpoint.
///
/// Exactly one of `data` and `error` is populated.
///
/// # Examples
/// ```
/// use ireal_backend::domain::{Envelope, EnvelopeMeta};
/// use serde_json::json;
///
/// let envelope = Envelope::success(json!({ "id": 1 }), EnvelopeMeta::for_request("req-1"));
/// let body = serde_json::to_value(&envelope).expect("serialise");
/// assert_eq!(body["error"], serde_json::Value::Null);
/// assert_eq!(body["meta"]["requestId"], "req-1");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Payload on success.
    pub data: Option<T>,
    /// Error body on failure.
    pub error: Option<EnvelopeError>,
    /// Response metadata.
    pub meta: EnvelopeMeta,
}

impl<T> Envelope<T> {
    /// Successful envelope.
    pub fn success(data: T, meta: EnvelopeMeta) -> Self {
        Self {
            data: Some(data),
            error: None,
            meta,
        }
    }

    /// Failed envelope.
    pub fn failure(error: EnvelopeError, meta: EnvelopeMeta) -> Self {
        Self {
            data: None,
            error: Some(error),
            meta,
        }
    }
}

impl Envelope<Value> {
    /// Render a domain error, redacting internal messages.
    #[must_use]
    pub fn from_error(error: &Error) -> Self {
        let (message, details) = if error.code() == ErrorCode::InternalError {
            ("Internal server error".to_owned(), None)
        } else {
            (error.message().to_owned(), error.details().cloned())
        };
        let request_id = error.request_id().map_or_else(
            || RequestId::current_or_generate().to_string(),
            str::to_owned,
        );
        Self::failure(
            EnvelopeError {
                code: error.wire_code().to_owned(),
                message,
                details,
            },
            EnvelopeMeta::for_request(request_id),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn success_serialises_null_error() {
        let envelope = Envelope::success(json!([1, 2]), EnvelopeMeta::for_request("r"));
        let body = serde_json::to_value(&envelope).expect("serialise");
        assert_eq!(
            body,
            json!({ "data": [1, 2], "error": null, "meta": { "requestId": "r" } })
        );
    }

    #[rstest]
    fn merged_meta_keeps_our_request_id() {
        let relayed = json!({ "requestId": "upstream", "provider": "openai", "model": "m1" });
        let Value::Object(relayed) = relayed else {
            panic!("object literal");
        };
        let meta = EnvelopeMeta::for_request("ours").merged(relayed);
        assert_eq!(meta.request_id, "ours");
        assert_eq!(meta.provider.as_deref(), Some("openai"));
        assert_eq!(meta.extra.get("model"), Some(&json!("m1")));
    }

    #[rstest]
    fn internal_errors_are_redacted() {
        let err = Error::internal("db password leaked").with_request_id("r");
        let envelope = Envelope::from_error(&err);
        let error = envelope.error.expect("error body");
        assert_eq!(error.code, "internal_error");
        assert_eq!(error.message, "Internal server error");
        assert!(envelope.data.is_none());
    }

    #[rstest]
    fn reason_replaces_category_code() {
        let err = Error::bad_gateway("upstream unreachable")
            .with_reason("calendar_export_failed")
            .with_request_id("r");
        let envelope = Envelope::from_error(&err);
        assert_eq!(
            envelope.error.map(|e| e.code),
            Some("calendar_export_failed".to_owned())
        );
    }

    #[rstest]
    fn decodes_upstream_envelope_with_extra_meta() {
        let body = json!({
            "data": { "ok": true },
            "error": null,
            "meta": { "requestId": "u-1", "provider": "svc", "latencyMs": 12 }
        });
        let envelope: Envelope<Value> = serde_json::from_value(body).expect("decode");
        assert_eq!(envelope.meta.provider.as_deref(), Some("svc"));
        assert_eq!(envelope.meta.extra.get("latencyMs"), Some(&json!(12)));
    }
}
