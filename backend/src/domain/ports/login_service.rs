//! Driving port that turns login credentials into a session user.

use async_trait::async_trait;
use uuid::{Uuid, uuid};

use crate::domain::{Error, LoginCredentials, UserId};

/// User id issued by [`FixtureLoginService`] for its default account.
pub const FIXTURE_USER_ID: Uuid = uuid!("123e4567-e89b-12d3-a456-426614174000");

/// Authenticates credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Single-account authenticator for development deployments.
///
/// The default account is `admin` / `password`.
#[derive(Debug, Clone)]
pub struct FixtureLoginService {
    username: String,
    password: String,
    user: UserId,
}

impl FixtureLoginService {
    /// Authenticator accepting exactly one account.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>, user: UserId) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            user,
        }
    }
}

impl Default for FixtureLoginService {
    fn default() -> Self {
        Self::new("admin", "password", UserId::from_uuid(FIXTURE_USER_ID))
    }
}

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.username() == self.username && credentials.password() == self.password {
            Ok(self.user.clone())
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
