//! HTTP inbound adapter exposing REST endpoints.
//!
//! Every API handler returns `ApiResult`, so clients always receive the
//! `{data, error, meta}` envelope.

pub mod calendar;
pub mod client_config;
pub mod error;
pub mod extractors;
pub mod generate;
pub mod health;
pub mod ideas;
pub mod identity;
pub mod plans;
pub mod publish;
pub(crate) mod respond;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::dev::ServiceResponse;
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{HttpResponse, ResponseError, web};

use crate::domain::Error;

pub use error::ApiResult;

fn no_such_endpoint() -> Error {
    Error::not_found("no such endpoint")
}

/// Fallback for `/api/v1` paths no handler serves.
pub async fn unknown_endpoint() -> ApiResult<HttpResponse> {
    Err(no_such_endpoint())
}

/// Replace the framework's empty `405` with a `not_found` envelope.
///
/// Register with `ErrorHandlers` on the API scope.
///
/// # Errors
/// Never fails.
pub fn method_not_allowed<B>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let (req, _) = res.into_parts();
    let response = no_such_endpoint().error_response();
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}

/// Register every `/api/v1` handler and the extractor error handlers.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use ireal_backend::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    extractors::configure(cfg);
    cfg.service(users::login)
        .service(users::logout)
        .service(users::me)
        .service(client_config::client_config)
        .service(ideas::create_idea)
        .service(ideas::list_ideas)
        .service(ideas::get_idea)
        .service(ideas::update_idea)
        .service(ideas::delete_idea)
        .service(ideas::attach_plans)
        .service(plans::attach_ideas)
        .service(plans::list_plan_ideas)
        .service(plans::plan_chat)
        .service(calendar::save_calendar)
        .service(calendar::export_calendar)
        .service(publish::publish)
        .service(generate::generate);
}
