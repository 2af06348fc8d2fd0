//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::web;
use serde_json::Value;

use crate::domain::ports::{
    DisabledCalendar, DisabledPlanChat, DisabledPublish, FixtureLoginService,
    UnconfiguredTextGenerator,
};
use crate::domain::{ClientFlags, LocalIdeasService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryIdeaRepository;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by a response, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Ports with every capability served locally over an in-memory store.
pub fn local_ports() -> HttpStatePorts {
    let repo = Arc::new(InMemoryIdeaRepository::default());
    HttpStatePorts {
        login: Arc::new(FixtureLoginService::default()),
        ideas: Arc::new(LocalIdeasService::new(
            repo,
            Arc::new(mockable::DefaultClock),
        )),
        calendar: Arc::new(DisabledCalendar),
        plan_chat: Arc::new(DisabledPlanChat),
        publish: Arc::new(DisabledPublish),
        generator: Arc::new(UnconfiguredTextGenerator),
    }
}

/// Handler state built from [`local_ports`].
pub fn local_state() -> web::Data<HttpState> {
    web::Data::new(HttpState::new(local_ports(), ClientFlags::default()))
}

/// Decode a response body as JSON.
pub async fn read_json<B>(res: ServiceResponse<B>) -> Value
where
    B: actix_web::body::MessageBody,
{
    let bytes = actix_web::test::read_body(res).await;
    serde_json::from_slice(&bytes).expect("json body")
}
