//! Envelope responses for successful handler results.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use tracing::warn;

use crate::domain::{Envelope, EnvelopeMeta, Error, ServiceOutcome};
use crate::inbound::http::ApiResult;

/// `200` envelope around `data` with the current request metadata.
pub(crate) fn ok<T: Serialize>(data: T) -> HttpResponse {
    with_meta(StatusCode::OK, data, EnvelopeMeta::current())
}

/// Envelope around `data` with explicit status and metadata.
pub(crate) fn with_meta<T: Serialize>(
    status: StatusCode,
    data: T,
    meta: EnvelopeMeta,
) -> HttpResponse {
    HttpResponse::build(status).json(Envelope::success(data, meta))
}

/// Render a capability outcome, keeping its status and relayed metadata.
pub(crate) fn relay(outcome: ServiceOutcome) -> ApiResult<HttpResponse> {
    let ServiceOutcome { status, data, meta } = outcome.into_renderable();
    let status = StatusCode::from_u16(status)
        .ok()
        .filter(StatusCode::is_success)
        .ok_or_else(|| {
            warn!(status, "capability returned a non-success status as data");
            Error::bad_gateway(format!("unexpected upstream status {status}"))
        })?;
    Ok(with_meta(status, data, EnvelopeMeta::current().merged(meta)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RequestId;
    use actix_web::body::to_bytes;
    use serde_json::{Map, Value, json};

    #[actix_web::test]
    async fn relay_keeps_status_and_meta() {
        let id: RequestId = "req-1".parse().expect("request id");
        let mut meta = Map::new();
        meta.insert("provider".to_owned(), json!("svc"));
        let outcome = ServiceOutcome {
            status: 201,
            data: json!({ "id": 1 }),
            meta,
        };
        let res = RequestId::scope(id, async { relay(outcome) })
            .await
            .expect("relayed");
        assert_eq!(res.status(), StatusCode::CREATED);
        let bytes = to_bytes(res.into_body()).await.expect("body");
        let body: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(
            body,
            json!({
                "data": { "id": 1 },
                "error": null,
                "meta": { "requestId": "req-1", "provider": "svc" }
            })
        );
    }

    #[actix_web::test]
    async fn no_content_is_relayed_as_an_envelope() {
        let res = relay(ServiceOutcome::with_status(204, Value::Null)).expect("relayed");
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body()).await.expect("body");
        let body: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body["data"], json!({}));
        assert_eq!(body["error"], Value::Null);
        assert!(body["meta"]["requestId"].is_string());
    }

    #[actix_web::test]
    async fn relay_rejects_error_statuses() {
        let err = relay(ServiceOutcome::with_status(500, Value::Null)).expect_err("not success");
        assert_eq!(err.code(), crate::domain::ErrorCode::BadGateway);
    }
}
