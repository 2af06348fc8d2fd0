//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into envelope responses with consistent
//! status codes.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Envelope, Error, ErrorCode, REQUEST_ID_HEADER};

pub use crate::domain::ApiResult;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::BadGateway => StatusCode::BAD_GATEWAY,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Relayed upstream statuses are honoured only when they describe a failure.
fn relayed_status(error: &Error) -> Option<StatusCode> {
    let raw = error.upstream_status()?;
    match StatusCode::from_u16(raw) {
        Ok(status) if status.is_client_error() || status.is_server_error() => Some(status),
        _ => {
            warn!(status = raw, "ignoring non-error upstream status");
            None
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::BadGateway => relayed_status(self).unwrap_or(StatusCode::BAD_GATEWAY),
            code => status_for(code),
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.code() == ErrorCode::InternalError {
            error!(error = %self, "request failed with internal error");
        }
        let envelope = Envelope::from_error(self);
        let mut builder = HttpResponse::build(self.status_code());
        builder.insert_header((REQUEST_ID_HEADER, envelope.meta.request_id.clone()));
        builder.json(envelope)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal("Internal server error")
    }
}
