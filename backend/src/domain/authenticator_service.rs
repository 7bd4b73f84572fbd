//! Bearer token authentication.
//!
//! A verified token yields the subject and, depending on [`RoleSource`],
//! either the role it was signed with or the role currently stored for the
//! subject.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::ports::{Authenticator, TokenCodec, TokenError, UserRepository};
use super::repository_errors::map_user_error;
use super::{Actor, Error};

/// Where an authenticated actor's role comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSource {
    /// Trust the role embedded in the token. A role change only takes
    /// effect once the holder's token expires.
    Token,
    /// Re-read the subject on each request; role changes and deletions take
    /// effect before the token expires.
    Store,
}

fn missing_token() -> Error {
    Error::unauthorized("no token provided").with_details(json!({ "code": "missing_token" }))
}

fn invalid_token(code: &'static str) -> Error {
    Error::unauthorized("token invalid or expired").with_details(json!({ "code": code }))
}

/// Token-backed [`Authenticator`].
pub struct TokenAuthenticator<U> {
    tokens: Arc<dyn TokenCodec>,
    users: Arc<U>,
    role_source: RoleSource,
}

impl<U> TokenAuthenticator<U> {
    pub fn new(tokens: Arc<dyn TokenCodec>, users: Arc<U>, role_source: RoleSource) -> Self {
        Self {
            tokens,
            users,
            role_source,
        }
    }
}

#[async_trait]
impl<U> Authenticator for TokenAuthenticator<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, token: Option<String>) -> Result<Actor, Error> {
        let token = token
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(missing_token)?;

        let claims = self.tokens.verify(token).map_err(|err| {
            debug!(
                error = %err,
                expired = matches!(err, TokenError::Expired),
                "bearer token rejected"
            );
            invalid_token("invalid_token")
        })?;

        match self.role_source {
            RoleSource::Token => Ok(Actor::new(claims.subject, claims.role)),
            RoleSource::Store => {
                let user = self
                    .users
                    .find_by_id(&claims.subject)
                    .await
                    .map_err(map_user_error)?
                    .ok_or_else(|| invalid_token("unknown_subject"))?;
                Ok(Actor::new(*user.id(), user.role()))
            }
        }
    }
}
