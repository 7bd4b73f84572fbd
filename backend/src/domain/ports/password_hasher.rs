//! Port for one-way password hashing.

use crate::domain::{CredentialHash, PlainPassword};

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashers.
    pub enum PasswordHashError {
        /// Hashing could not be performed.
        Hashing { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &PlainPassword) -> Result<CredentialHash, PasswordHashError>;

    /// `Ok(false)` on mismatch; errors are reserved for unusable hashes.
    fn verify(
        &self,
        password: &PlainPassword,
        hash: &CredentialHash,
    ) -> Result<bool, PasswordHashError>;
}
