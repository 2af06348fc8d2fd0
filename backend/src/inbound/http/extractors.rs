//! Extractor configuration that turns framework rejections into envelopes.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use serde_json::json;

use crate::domain::Error;

fn rejected(message: String, code: &str) -> actix_web::Error {
    Error::invalid_request(message)
        .with_details(json!({ "code": code }))
        .into()
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let code = match &err {
        JsonPayloadError::ContentType => "unsupported_content_type",
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "payload_too_large"
        }
        _ => "invalid_json",
    };
    rejected(format!("invalid JSON body: {err}"), code)
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    rejected(format!("invalid path parameter: {err}"), "invalid_path")
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    rejected(format!("invalid query string: {err}"), "invalid_query")
}

/// Register extractor error handlers on a scope or app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .app_data(web::QueryConfig::default().error_handler(query_error));
}
