//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{CredentialHash, EmailAddress, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses this email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

/// A user together with their stored credential.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: CredentialHash,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; fails with `DuplicateEmail` when the email is taken.
    async fn insert(
        &self,
        user: &User,
        password_hash: &CredentialHash,
    ) -> Result<(), UserRepositoryError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch the user and credential registered under `email`.
    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;

    /// All users, newest registration first.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Persist a changed role. Returns `false` when the user no longer exists.
    async fn update_role(&self, user: &User) -> Result<bool, UserRepositoryError>;

    /// Remove a user. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError>;
}
