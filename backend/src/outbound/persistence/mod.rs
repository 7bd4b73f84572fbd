//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the help desk repository ports backed by
//! PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Authorisation and workflow rules live in the domain.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: pool and Diesel failures map onto each
//!   port's `Connection`/`Query` variants.
//!
//! # Example
//!
//! ```ignore
//! use helpdesk::outbound::persistence::{DbPool, DieselTicketRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/helpdesk")).await?;
//! let tickets = DieselTicketRepository::new(pool.clone());
//! ```

mod diesel_activity_log_repository;
mod diesel_basic_error_mapping;
mod diesel_comment_repository;
mod diesel_ticket_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_activity_log_repository::DieselActivityLogRepository;
pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_ticket_repository::DieselTicketRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
