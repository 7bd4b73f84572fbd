//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Emails are unique via the `users_email_key` constraint; an insert that
//! trips it surfaces as `UserRepositoryError::DuplicateEmail`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{StoredCredentials, UserRepository, UserRepositoryError};
use crate::domain::{CredentialHash, EmailAddress, Role, User, UserId, UserName, UserParts};

use super::diesel_basic_error_mapping::{
    is_unique_violation_on, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserRoleUpdate, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, |message| UserRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        |message| UserRepositoryError::query(message),
        |message| UserRepositoryError::connection(message),
    )
}

/// Convert a database row to a domain user and its stored hash.
///
/// Rows that no longer satisfy domain validation are reported as query
/// failures rather than silently repaired.
fn row_to_credentials(row: UserRow) -> Result<StoredCredentials, UserRepositoryError> {
    let corrupt = |field: &str, reason: String| {
        warn!(user_id = %row.id, field, %reason, "stored user row is invalid");
        UserRepositoryError::query(format!("stored user has invalid {field}"))
    };
    let name = UserName::new(&row.name).map_err(|err| corrupt("name", err.to_string()))?;
    let email = EmailAddress::new(&row.email).map_err(|err| corrupt("email", err.to_string()))?;
    let role: Role = row
        .role
        .parse()
        .map_err(|err: crate::domain::UnknownRole| corrupt("role", err.to_string()))?;
    let user = User::restore(UserParts {
        id: UserId::from_uuid(row.id),
        name,
        email,
        role,
        created_at: row.created_at,
        updated_at: row.updated_at,
    });
    Ok(StoredCredentials {
        user,
        password_hash: CredentialHash::new(row.password_hash),
    })
}

fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    row_to_credentials(row).map(|stored| stored.user)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(
        &self,
        user: &User,
        password_hash: &CredentialHash,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            name: user.name().as_ref(),
            email: user.email().as_ref(),
            password_hash: password_hash.as_str(),
            role: user.role().as_str(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        };

        match diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
        {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation_on(&err, EMAIL_CONSTRAINT) => {
                Err(UserRepositoryError::duplicate_email(row.email))
            }
            Err(err) => Err(map_diesel_error(err)),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let email: &str = email.as_ref();
        let row = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_credentials).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order((users::created_at.desc(), users::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_user).collect()
    }

    async fn update_role(&self, user: &User) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserRoleUpdate {
            role: user.role().as_str(),
            updated_at: user.updated_at(),
        };
        let updated = diesel::update(users::table.filter(users::id.eq(user.id().as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(users::table.filter(users::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion coverage; query behaviour is exercised against a live
    //! database outside the unit suite.
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    #[fixture]
    fn row() -> UserRow {
        let at = Utc
            .with_ymd_and_hms(2025, 1, 2, 3, 4, 5)
            .single()
            .expect("valid timestamp");
        UserRow {
            id: Uuid::from_u128(7),
            name: "Grace Hopper".to_owned(),
            email: "grace@example.com".to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            role: "technician".to_owned(),
            created_at: at,
            updated_at: at,
        }
    }

    #[rstest]
    fn valid_row_restores_user_and_hash(row: UserRow) {
        let stored = row_to_credentials(row).expect("valid row");

        assert_eq!(stored.user.role(), Role::Technician);
        assert_eq!(stored.user.email().to_string(), "grace@example.com");
        assert_eq!(stored.password_hash.as_str(), "$argon2id$stub");
    }

    #[rstest]
    #[case::role("role")]
    #[case::email("email")]
    fn corrupt_columns_are_query_errors(mut row: UserRow, #[case] column: &str) {
        match column {
            "role" => row.role = "Superuser".to_owned(),
            _ => row.email = "not-an-email".to_owned(),
        }

        let err = row_to_user(row).expect_err("corrupt row");

        assert_eq!(
            err,
            UserRepositoryError::query(format!("stored user has invalid {column}"))
        );
    }
}
