//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns.
//! Bearer authentication is an extractor, not middleware; see
//! [`crate::inbound::http::auth`].

pub mod trace;

pub use trace::Trace;
