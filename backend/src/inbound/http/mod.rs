//! HTTP inbound adapter exposing REST endpoints.

pub mod activity;
pub mod auth;
pub mod comments;
pub mod envelope;
pub mod error;
pub mod health;
pub mod routes;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod tickets;
pub mod users;
pub(crate) mod validation;

pub use error::ApiResult;
