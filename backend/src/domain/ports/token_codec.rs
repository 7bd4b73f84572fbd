//! Port for issuing and verifying bearer tokens.
//!
//! The domain only needs a subject and a role back from a token; the signing
//! scheme belongs to the adapter.

use chrono::{DateTime, Utc};

use crate::domain::{Actor, Role, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures raised by token codecs.
    pub enum TokenError {
        /// The token is malformed or its signature does not verify.
        Invalid { message: String } => "token rejected: {message}",
        /// The token was well-formed but has expired.
        Expired => "token expired",
        /// A token could not be produced.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Claims recovered from a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: UserId,
    pub role: Role,
}

/// A freshly signed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Sign a token for `actor`, valid from `now`.
    fn issue(&self, actor: &Actor, now: DateTime<Utc>) -> Result<IssuedToken, TokenError>;

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
