//! Help desk backend library modules.
//!
//! The crate follows a hexagonal layout: [`domain`] holds aggregates,
//! authorisation policy and services; [`inbound`] adapts HTTP onto the
//! driving ports; [`outbound`] implements the driven ports over PostgreSQL,
//! an in-memory store, JWT and Argon2.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod state_builders;
#[cfg(feature = "test-support")]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
