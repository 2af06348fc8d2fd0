//! Shared helpers for HTTP integration tests.
//!
//! Every test binary uses every helper here; unused helpers trip the
//! `dead_code` lint per binary.

use std::net::SocketAddr;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use serde_json::{Value, json};

use ireal_backend::domain::{CapabilityFlags, ClientFlags};
use ireal_backend::inbound::http::health::HealthState;
use ireal_backend::inbound::http::session_config::SessionSettings;
use ireal_backend::inbound::http::state::HttpState;
use ireal_backend::outbound::generation::OpenAiSettings;
use ireal_backend::server::{
    AppDependencies, BackendConfig, GatewayConfig, SESSION_COOKIE, ServerConfig,
    build_http_state,
};

/// Typed configuration with the given forwarding flags.
pub fn backend_config(
    capabilities: CapabilityFlags,
    gateway: Option<GatewayConfig>,
    generator: Option<OpenAiSettings>,
) -> BackendConfig {
    BackendConfig {
        client_flags: ClientFlags {
            nav_state_experiment: false,
            capabilities,
        },
        gateway,
        generator,
        database_url: None,
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
    }
}

/// Dependencies for one app instance over the in-memory ideas store.
pub fn app_deps(config: BackendConfig) -> AppDependencies {
    let http_state: HttpState = build_http_state(config, None).expect("state builds");
    let health_state = HealthState::new();
    health_state.mark_ready();
    AppDependencies {
        health_state: web::Data::new(health_state),
        http_state: web::Data::new(http_state),
        config: ServerConfig::new(
            SessionSettings {
                key: Key::generate(),
                cookie_secure: false,
                same_site: SameSite::Lax,
                ttl_hours: 2,
            },
            SocketAddr::from(([127, 0, 0, 1], 0)),
        ),
    }
}

/// Log in with the fixture account and return the session cookie.
pub async fn login<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "username": "admin", "password": "password" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie")
}

/// Send `req` and return the status with the decoded JSON body.
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, req).await;
    let status = res.status();
    let body: Value = test::read_body_json(res).await;
    (status, body)
}
