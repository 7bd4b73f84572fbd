//! Test utilities for integration tests.
//!
//! Compiled only with the `test-support` feature. Builds the full service
//! graph over the in-memory store so `backend/tests/` can drive the real
//! router without PostgreSQL.

use std::sync::Arc;

use chrono::Duration;
use mockable::{Clock, DefaultClock};

use crate::inbound::http::state::HttpState;
use crate::outbound::auth::{Argon2PasswordHasher, JwtTokenCodec};
use crate::outbound::memory::InMemoryStore;
use crate::state_builders::{Credentials, ServiceOptions, build_http_state, in_memory_repositories};

/// Secret signing every token issued through [`credentials`].
pub const TEST_JWT_SECRET: &[u8] = b"helpdesk-test-secret";

/// JWT codec and a deliberately cheap Argon2id hasher.
pub fn credentials() -> Credentials {
    let hasher = Argon2PasswordHasher::with_params(64, 1, 1).unwrap_or_default();
    Credentials {
        tokens: Arc::new(JwtTokenCodec::new(TEST_JWT_SECRET, Duration::hours(1))),
        hasher: Arc::new(hasher),
    }
}

/// HTTP state over a fresh in-memory store with default options.
pub fn in_memory_state() -> HttpState {
    in_memory_state_with(ServiceOptions::default(), Arc::new(DefaultClock))
}

/// HTTP state over a fresh in-memory store.
pub fn in_memory_state_with(options: ServiceOptions, clock: Arc<dyn Clock>) -> HttpState {
    build_http_state(
        in_memory_repositories(InMemoryStore::new()),
        credentials(),
        options,
        clock,
    )
}
