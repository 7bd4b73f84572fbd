//! Driving port resolving a bearer token into an [`Actor`].

use async_trait::async_trait;

use crate::domain::{Actor, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// `token` is `None` when the request carried no credentials at all.
    async fn authenticate(&self, token: Option<String>) -> Result<Actor, Error>;
}
