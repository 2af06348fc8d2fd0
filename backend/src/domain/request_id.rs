//! Request-scoped correlation identifier.
//!
//! `RequestId` follows a request through the system and out to the external
//! service as the `x-request-id` header. It uses task-local storage so the
//! current identifier is available without explicit parameter threading.
//!
//! Tokio task-local variables are not inherited across spawned tasks. Use
//! [`RequestId::scope`] when spawning new tasks to keep the identifier.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Header carrying the correlation identifier inbound and outbound.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

task_local! {
    /// Task-local storage for the current request identifier.
    pub(crate) static REQUEST_ID: RequestId;
}

/// Validation errors raised when parsing a caller-supplied identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestIdError {
    /// The identifier is empty.
    #[error("request id must not be empty")]
    Empty,
    /// The identifier exceeds the accepted length.
    #[error("request id must be at most {max} characters")]
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The identifier contains whitespace or non-printable characters.
    #[error("request id must contain printable ASCII only")]
    InvalidCharacters,
}

/// Per-request correlation identifier exposed via task-local storage.
///
/// # Examples
/// ```
/// use ireal_backend::domain::RequestId;
///
/// async fn handler() {
///     if let Some(id) = RequestId::current() {
///         tracing::info!(request_id = %id, "handling");
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random identifier (UUID v4).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier in scope, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        REQUEST_ID.try_with(Clone::clone).ok()
    }

    /// Returns the identifier in scope, generating one when none is set.
    #[must_use]
    pub fn current_or_generate() -> Self {
        Self::current().unwrap_or_else(Self::generate)
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Execute the provided future with the supplied identifier in scope.
    ///
    /// # Examples
    /// ```
    /// use ireal_backend::domain::RequestId;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let id: RequestId = "abc-123".parse().expect("valid id");
    /// let observed = RequestId::scope(id.clone(), async { RequestId::current() }).await;
    /// assert_eq!(observed, Some(id));
    /// # });
    /// ```
    pub async fn scope<Fut>(request_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        REQUEST_ID.scope(request_id, fut).await
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RequestId {
    type Err = RequestIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(RequestIdError::Empty);
        }
        if s.chars().count() > MAX_REQUEST_ID_LEN {
            return Err(RequestIdError::TooLong {
                max: MAX_REQUEST_ID_LEN,
            });
        }
        if !s.chars().all(|c| c.is_ascii_graphic()) {
            return Err(RequestIdError::InvalidCharacters);
        }
        Ok(Self(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn generate_produces_uuid() {
        let id = RequestId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[tokio::test]
    async fn current_reflects_scope() {
        let expected = RequestId::generate();
        let observed = RequestId::scope(expected.clone(), async { RequestId::current() }).await;
        assert_eq!(observed, Some(expected));
    }

    #[tokio::test]
    async fn current_is_none_out_of_scope() {
        assert!(RequestId::current().is_none());
    }

    #[rstest]
    #[case("", RequestIdError::Empty)]
    #[case("has space", RequestIdError::InvalidCharacters)]
    #[case("tab\there", RequestIdError::InvalidCharacters)]
    fn rejects_malformed_ids(#[case] raw: &str, #[case] expected: RequestIdError) {
        assert_eq!(raw.parse::<RequestId>(), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_ids() {
        let raw = "a".repeat(MAX_REQUEST_ID_LEN + 1);
        assert_eq!(
            raw.parse::<RequestId>(),
            Err(RequestIdError::TooLong {
                max: MAX_REQUEST_ID_LEN
            })
        );
    }

    #[rstest]
    fn accepts_caller_supplied_ids() {
        let id: RequestId = "client-7f3a".parse().expect("valid id");
        assert_eq!(id.to_string(), "client-7f3a");
    }
}
