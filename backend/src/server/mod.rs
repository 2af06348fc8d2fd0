//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::{AppSettings, BackendConfig, GatewayConfig, SettingsError};
pub use state_builders::{StateBuildError, build_http_state};

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::ErrorHandlers;
use actix_web::{App, HttpServer, web};

use crate::RequestTrace;
use crate::inbound::http::{configure_api, method_not_allowed, unknown_endpoint};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "session";

/// Everything one application instance needs.
#[derive(Clone)]
pub struct AppDependencies {
    /// Probe state shared with the caller of [`create_server`].
    pub health_state: web::Data<HealthState>,
    /// Handler ports.
    pub http_state: web::Data<HttpState>,
    /// Session and listener settings.
    pub config: ServerConfig,
}

/// Build the actix application: session-wrapped `/api/v1` scope, request
/// tracing and health probes.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        config,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), config.key)
        .cookie_name(SESSION_COOKIE.into())
        .cookie_path("/".into())
        .cookie_secure(config.cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(config.same_site)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(CookieDuration::hours(config.session_ttl_hours)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(ErrorHandlers::new().handler(StatusCode::METHOD_NOT_ALLOWED, method_not_allowed))
        .wrap(session)
        .configure(configure_api)
        .default_service(web::to(unknown_endpoint));

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(RequestTrace)
        .service(api)
        .service(ready)
        .service(live)
}

/// Construct an Actix HTTP server bound to `config.bind_addr()`.
///
/// Readiness flips to ready once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let bind_addr = config.bind_addr();
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state,
        config,
    };
    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}
