//! Driving port for registration and login.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, User};

use super::IssuedToken;

/// A user together with a freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub user: User,
    pub token: IssuedToken,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn register(&self, registration: Registration) -> Result<AuthenticatedSession, Error>;

    /// Fails with `unauthorized` without revealing which half was wrong.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthenticatedSession, Error>;
}
