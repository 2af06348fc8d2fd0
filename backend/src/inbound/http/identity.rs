//! Caller identity extraction.
//!
//! Handlers take an [`Actor`] argument; resolution reads the `x-user-id`
//! header, the session user and the visitor cookie without ever failing or
//! touching cookies.

use actix_session::SessionExt;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use tracing::warn;

use crate::domain::{Actor, IdentitySources, resolve_caller};
use crate::inbound::http::session::SessionContext;

/// Header carrying an explicit caller id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Cookie holding the anonymous visitor id.
pub const VISITOR_COOKIE: &str = "ireal_visitor";

/// Resolve the actor for `req`.
#[must_use]
pub fn actor_for(req: &HttpRequest) -> Actor {
    let user = SessionContext::new(req.get_session())
        .user_id()
        .unwrap_or_else(|error| {
            warn!(%error, "ignoring unreadable session during identity resolution");
            None
        });
    let header = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok());
    let visitor = req.cookie(VISITOR_COOKIE);
    let identity = resolve_caller(&IdentitySources {
        header,
        session_user: user.as_ref(),
        visitor_cookie: visitor.as_ref().map(|cookie| cookie.value()),
    });
    Actor::new(identity, user)
}

impl FromRequest for Actor {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(actor_for(req)))
    }
}
