//! Caller identity resolution.
//!
//! Resolution is pure and infallible: it inspects the signals a request
//! carries and picks the first usable one. It never mutates cookies and never
//! triggers authentication.

use std::fmt;

use super::{Error, UserId};

/// Identity reported when a request carries no usable signal.
pub const ANONYMOUS_CALLER: &str = "anonymous";

/// Marker prepended to anonymous visitor cookie values.
pub const VISITOR_PREFIX: &str = "visitor:";

/// Opaque caller identifier forwarded upstream as `x-user-id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    /// The sentinel identity for callers with no signal.
    #[must_use]
    pub fn anonymous() -> Self {
        Self(ANONYMOUS_CALLER.to_owned())
    }

    /// Borrow the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the anonymous sentinel.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS_CALLER
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity signals extracted from an inbound request.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentitySources<'a> {
    /// Explicit identity header value.
    pub header: Option<&'a str>,
    /// User id stored in the authenticated session cookie.
    pub session_user: Option<&'a UserId>,
    /// Anonymous visitor cookie value.
    pub visitor_cookie: Option<&'a str>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolve the caller identity from request signals.
///
/// Sources are tried in order (header, session, visitor cookie) and the first
/// usable one wins; the sentinel [`ANONYMOUS_CALLER`] is returned otherwise.
///
/// # Examples
/// ```
/// use ireal_backend::domain::{IdentitySources, resolve_caller};
///
/// let caller = resolve_caller(&IdentitySources {
///     visitor_cookie: Some("abc"),
///     ..IdentitySources::default()
/// });
/// assert_eq!(caller.as_str(), "visitor:abc");
/// assert!(resolve_caller(&IdentitySources::default()).is_anonymous());
/// ```
#[must_use]
pub fn resolve_caller(sources: &IdentitySources<'_>) -> CallerIdentity {
    if let Some(header) = non_blank(sources.header) {
        return CallerIdentity(header.to_owned());
    }
    if let Some(user) = sources.session_user {
        return CallerIdentity(user.to_string());
    }
    if let Some(visitor) = non_blank(sources.visitor_cookie) {
        return CallerIdentity(format!("{VISITOR_PREFIX}{visitor}"));
    }
    CallerIdentity::anonymous()
}

/// The party performing a request: its resolved identity plus the
/// authenticated user, when a session exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    identity: CallerIdentity,
    user: Option<UserId>,
}

impl Actor {
    /// Combine a resolved identity with the authenticated session user.
    #[must_use]
    pub fn new(identity: CallerIdentity, user: Option<UserId>) -> Self {
        Self { identity, user }
    }

    /// Actor for an authenticated user with no other identity signals.
    #[must_use]
    pub fn authenticated(user: UserId) -> Self {
        let identity = resolve_caller(&IdentitySources {
            session_user: Some(&user),
            ..IdentitySources::default()
        });
        Self::new(identity, Some(user))
    }

    /// Resolved caller identity.
    #[must_use]
    pub fn identity(&self) -> &CallerIdentity {
        &self.identity
    }

    /// Authenticated session user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    /// Require an authenticated user or fail with `401`.
    ///
    /// # Errors
    /// Returns [`Error::unauthorized`] when no session user is present.
    pub fn require_user(&self) -> Result<&UserId, Error> {
        self.user
            .as_ref()
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}
