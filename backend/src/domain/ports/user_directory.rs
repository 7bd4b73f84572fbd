//! Driving port for account administration.

use async_trait::async_trait;

use crate::domain::{Actor, Error, Role, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// All users, newest first. Admin only.
    async fn list(&self, actor: &Actor) -> Result<Vec<User>, Error>;

    async fn get(&self, actor: &Actor, id: &UserId) -> Result<User, Error>;

    /// The caller's own record.
    async fn profile(&self, actor: &Actor) -> Result<User, Error>;

    async fn change_role(&self, actor: &Actor, target: &UserId, role: Role)
    -> Result<User, Error>;

    async fn delete(&self, actor: &Actor, target: &UserId) -> Result<(), Error>;
}
