//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountService, ActivityQuery, Authenticator, CommentWorkflow, TicketWorkflow, UserDirectory,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountService>,
    pub authenticator: Arc<dyn Authenticator>,
    pub users: Arc<dyn UserDirectory>,
    pub tickets: Arc<dyn TicketWorkflow>,
    pub comments: Arc<dyn CommentWorkflow>,
    pub activity: Arc<dyn ActivityQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub authenticator: Arc<dyn Authenticator>,
    pub users: Arc<dyn UserDirectory>,
    pub tickets: Arc<dyn TicketWorkflow>,
    pub comments: Arc<dyn CommentWorkflow>,
    pub activity: Arc<dyn ActivityQuery>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            authenticator,
            users,
            tickets,
            comments,
            activity,
        } = ports;
        Self {
            accounts,
            authenticator,
            users,
            tickets,
            comments,
            activity,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
