//! Account administration use-cases.
//!
//! Checks run coarse-to-fine: the actor must be an admin, the target must
//! exist, and an admin may not act on their own account.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use super::audit::AuditTrail;
use super::policy::{Action, ResourceOwnership, enforce};
use super::ports::{ActivityLogRepository, UserDirectory, UserRepository};
use super::repository_errors::map_user_error;
use super::{ActivityAction, ActivityRecord, Actor, Error, Role, User, UserId};

/// User administration service implementing [`UserDirectory`].
pub struct UserDirectoryService<U, A> {
    users: Arc<U>,
    audit: AuditTrail<A>,
    clock: Arc<dyn Clock>,
}

impl<U, A> UserDirectoryService<U, A>
where
    U: UserRepository,
    A: ActivityLogRepository,
{
    pub fn new(users: Arc<U>, audit: AuditTrail<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            audit,
            clock,
        }
    }

    async fn load(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}

#[async_trait]
impl<U, A> UserDirectory for UserDirectoryService<U, A>
where
    U: UserRepository,
    A: ActivityLogRepository,
{
    async fn list(&self, actor: &Actor) -> Result<Vec<User>, Error> {
        enforce(actor, &ResourceOwnership::none(), &Action::ManageUsers)?;
        self.users.list().await.map_err(map_user_error)
    }

    async fn get(&self, actor: &Actor, id: &UserId) -> Result<User, Error> {
        enforce(actor, &ResourceOwnership::none(), &Action::ManageUsers)?;
        self.load(id).await
    }

    async fn profile(&self, actor: &Actor) -> Result<User, Error> {
        self.load(actor.id()).await
    }

    async fn change_role(
        &self,
        actor: &Actor,
        target: &UserId,
        role: Role,
    ) -> Result<User, Error> {
        enforce(actor, &ResourceOwnership::none(), &Action::ManageUsers)?;
        let mut user = self.load(target).await?;
        enforce(
            actor,
            &ResourceOwnership::none(),
            &Action::ChangeUserRole { target },
        )?;

        let previous = user.change_role(role, self.clock.utc());
        if !self.users.update_role(&user).await.map_err(map_user_error)? {
            return Err(Error::not_found("User not found"));
        }
        info!(user_id = %target, %previous, %role, "user role changed");

        self.audit
            .record(ActivityRecord::unscoped(
                ActivityAction::RoleUpdated,
                *actor.id(),
                json!({ "userId": target, "previousRole": previous, "role": role }),
            ))
            .await?;
        Ok(user)
    }

    async fn delete(&self, actor: &Actor, target: &UserId) -> Result<(), Error> {
        enforce(actor, &ResourceOwnership::none(), &Action::ManageUsers)?;
        let user = self.load(target).await?;
        enforce(
            actor,
            &ResourceOwnership::none(),
            &Action::DeleteUser { target },
        )?;

        if !self.users.delete(target).await.map_err(map_user_error)? {
            return Err(Error::not_found("User not found"));
        }
        info!(user_id = %target, "user deleted");

        self.audit
            .record(ActivityRecord::unscoped(
                ActivityAction::UserDeleted,
                *actor.id(),
                json!({ "userId": target, "email": user.email().as_ref() }),
            ))
            .await?;
        Ok(())
    }
}
