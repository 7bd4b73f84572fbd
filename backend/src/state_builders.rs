//! Builders wiring repositories and credential adapters into HTTP state.
//!
//! The server and the integration-test harness share these so both exercise
//! the same domain services. Storage is chosen by the caller: an
//! [`InMemoryStore`] when no database is configured, Diesel repositories
//! over a [`DbPool`] otherwise.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    ActivityLogRepository, CommentRepository, PasswordHasher, TicketRepository, TokenCodec,
    UserRepository,
};
use crate::domain::{
    AccountManager, ActivityQueryService, AuditTrail, CommentService, RoleSource, TicketService,
    TokenAuthenticator, UserDirectoryService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::persistence::{
    DbPool, DieselActivityLogRepository, DieselCommentRepository, DieselTicketRepository,
    DieselUserRepository,
};

/// The four driven storage ports, possibly backed by one adapter.
pub struct Repositories<U, T, C, A> {
    pub users: Arc<U>,
    pub tickets: Arc<T>,
    pub comments: Arc<C>,
    pub activity: Arc<A>,
}

/// Token and password adapters.
#[derive(Clone)]
pub struct Credentials {
    pub tokens: Arc<dyn TokenCodec>,
    pub hasher: Arc<dyn PasswordHasher>,
}

/// Behavioural switches taken from configuration.
#[derive(Debug, Clone, Copy)]
pub struct ServiceOptions {
    pub role_source: RoleSource,
    pub audit_ticket_updates: bool,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            role_source: RoleSource::Store,
            audit_ticket_updates: true,
        }
    }
}

/// Repositories sharing one in-process store.
pub fn in_memory_repositories(
    store: InMemoryStore,
) -> Repositories<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore> {
    let store = Arc::new(store);
    Repositories {
        users: store.clone(),
        tickets: store.clone(),
        comments: store.clone(),
        activity: store,
    }
}

/// PostgreSQL repositories sharing `pool`.
pub fn diesel_repositories(
    pool: &DbPool,
) -> Repositories<
    DieselUserRepository,
    DieselTicketRepository,
    DieselCommentRepository,
    DieselActivityLogRepository,
> {
    Repositories {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        tickets: Arc::new(DieselTicketRepository::new(pool.clone())),
        comments: Arc::new(DieselCommentRepository::new(pool.clone())),
        activity: Arc::new(DieselActivityLogRepository::new(pool.clone())),
    }
}

/// Build every driving-port service over `repositories`.
pub fn build_http_state<U, T, C, A>(
    repositories: Repositories<U, T, C, A>,
    credentials: Credentials,
    options: ServiceOptions,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserRepository + 'static,
    T: TicketRepository + 'static,
    C: CommentRepository + 'static,
    A: ActivityLogRepository + 'static,
{
    let Repositories {
        users,
        tickets,
        comments,
        activity,
    } = repositories;
    let Credentials { tokens, hasher } = credentials;
    let audit = AuditTrail::new(activity.clone(), clock.clone());

    HttpState::new(HttpStatePorts {
        accounts: Arc::new(AccountManager::new(
            users.clone(),
            hasher,
            tokens.clone(),
            audit.clone(),
            clock.clone(),
        )),
        authenticator: Arc::new(TokenAuthenticator::new(
            tokens,
            users.clone(),
            options.role_source,
        )),
        users: Arc::new(UserDirectoryService::new(
            users.clone(),
            audit.clone(),
            clock.clone(),
        )),
        tickets: Arc::new(
            TicketService::new(tickets.clone(), users, audit.clone(), clock.clone())
                .with_update_auditing(options.audit_ticket_updates),
        ),
        comments: Arc::new(CommentService::new(comments, tickets, audit, clock)),
        activity: Arc::new(ActivityQueryService::new(activity)),
    })
}
