//! Registration and login.
//!
//! Login failures never say whether the email or the password was wrong.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use super::audit::AuditTrail;
use super::ports::{
    AccountService, ActivityLogRepository, AuthenticatedSession, PasswordHasher, TokenCodec,
    UserRepository,
};
use super::repository_errors::{map_hash_error, map_signing_error, map_user_error};
use super::{
    ActivityAction, ActivityRecord, Actor, Error, LoginCredentials, Registration, User, UserId,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Account service wiring the user store, password hasher and token codec.
pub struct AccountManager<U, A> {
    users: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenCodec>,
    audit: AuditTrail<A>,
    clock: Arc<dyn Clock>,
}

impl<U, A> AccountManager<U, A>
where
    U: UserRepository,
    A: ActivityLogRepository,
{
    pub fn new(
        users: Arc<U>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenCodec>,
        audit: AuditTrail<A>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            audit,
            clock,
        }
    }

    fn session_for(&self, user: User) -> Result<AuthenticatedSession, Error> {
        let actor = Actor::new(*user.id(), user.role());
        let token = self
            .tokens
            .issue(&actor, self.clock.utc())
            .map_err(map_signing_error)?;
        Ok(AuthenticatedSession { user, token })
    }
}

#[async_trait]
impl<U, A> AccountService for AccountManager<U, A>
where
    U: UserRepository,
    A: ActivityLogRepository,
{
    async fn register(&self, registration: Registration) -> Result<AuthenticatedSession, Error> {
        let Registration {
            name,
            email,
            password,
            role,
        } = registration;
        let hash = self.hasher.hash(&password).map_err(map_hash_error)?;
        let user = User::register(UserId::random(), name, email, role, self.clock.utc());

        self.users
            .insert(&user, &hash)
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id(), %role, "user registered");

        self.audit
            .record(ActivityRecord::unscoped(
                ActivityAction::UserCreated,
                *user.id(),
                json!({
                    "userId": user.id(),
                    "email": user.email().as_ref(),
                    "role": user.role(),
                }),
            ))
            .await?;
        self.session_for(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthenticatedSession, Error> {
        let Some(stored) = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            warn!(reason = "unknown_email", "login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(map_hash_error)?;
        if !matches {
            warn!(user_id = %stored.user.id(), reason = "password_mismatch", "login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        info!(user_id = %stored.user.id(), "user logged in");
        self.session_for(stored.user)
    }
}

#[cfg(test)]
mod tests {
    //! Registration and login flows over mocked ports.
    use super::*;
    use crate::domain::ports::{
        IssuedToken, MockActivityLogRepository, MockPasswordHasher, MockTokenCodec,
        MockUserRepository, StoredCredentials, UserRepositoryError,
    };
    use crate::domain::test_fixtures::FixedClock;
    use crate::domain::{CredentialHash, EmailAddress, ErrorCode, Role, UserName};
    use rstest::rstest;

    fn hasher(matches: bool) -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Ok(CredentialHash::new("$argon2id$stub")));
        hasher.expect_verify().returning(move |_, _| Ok(matches));
        hasher
    }

    fn tokens() -> MockTokenCodec {
        let mut tokens = MockTokenCodec::new();
        tokens.expect_issue().returning(|_, now| {
            Ok(IssuedToken {
                token: "signed".to_owned(),
                expires_at: now,
            })
        });
        tokens
    }

    fn manager(
        users: MockUserRepository,
        log: MockActivityLogRepository,
        matches: bool,
    ) -> AccountManager<MockUserRepository, MockActivityLogRepository> {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::default());
        AccountManager::new(
            Arc::new(users),
            Arc::new(hasher(matches)),
            Arc::new(tokens()),
            AuditTrail::new(Arc::new(log), Arc::clone(&clock)),
            clock,
        )
    }

    fn registration() -> Registration {
        Registration::try_from_parts("Ada", "ada@example.com", "correct horse", None)
            .expect("valid registration")
    }

    fn stored_credentials() -> StoredCredentials {
        StoredCredentials {
            user: User::register(
                UserId::random(),
                UserName::new("Ada").expect("name"),
                EmailAddress::new("ada@example.com").expect("email"),
                Role::Technician,
                FixedClock::default().utc(),
            ),
            password_hash: CredentialHash::new("$argon2id$stub"),
        }
    }

    fn credentials() -> LoginCredentials {
        LoginCredentials::try_from_parts("ada@example.com", "correct horse")
            .expect("credentials shape")
    }

    #[rstest]
    #[tokio::test]
    async fn register_stores_hash_and_returns_token() {
        let mut users = MockUserRepository::new();
        users
            .expect_insert()
            .withf(|user, hash| user.role() == Role::Client && hash.as_str() == "$argon2id$stub")
            .times(1)
            .returning(|_, _| Ok(()));
        let mut log = MockActivityLogRepository::new();
        log.expect_append()
            .withf(|entry| entry.action() == ActivityAction::UserCreated)
            .times(1)
            .returning(|_| Ok(()));

        let session = manager(users, log, true)
            .register(registration())
            .await
            .expect("registration succeeds");
        assert_eq!(session.token.token, "signed");
        assert_eq!(session.user.email().as_ref(), "ada@example.com");
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let mut users = MockUserRepository::new();
        users
            .expect_insert()
            .returning(|_, _| Err(UserRepositoryError::duplicate_email("ada@example.com")));
        let mut log = MockActivityLogRepository::new();
        log.expect_append().never();

        let err = manager(users, log, true)
            .register(registration())
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), "User already exists");
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some(()), false)]
    #[tokio::test]
    async fn login_failures_share_one_message(
        #[case] account: Option<()>,
        #[case] password_matches: bool,
    ) {
        let mut users = MockUserRepository::new();
        users
            .expect_find_credentials_by_email()
            .returning(move |_| Ok(account.map(|()| stored_credentials())));

        let err = manager(users, MockActivityLogRepository::new(), password_matches)
            .login(credentials())
            .await
            .expect_err("login rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "Invalid credentials");
    }

    #[rstest]
    #[tokio::test]
    async fn login_issues_token_with_stored_role() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_credentials_by_email()
            .returning(|_| Ok(Some(stored_credentials())));

        let session = manager(users, MockActivityLogRepository::new(), true)
            .login(credentials())
            .await
            .expect("login succeeds");
        assert_eq!(session.user.role(), Role::Technician);
    }
}
