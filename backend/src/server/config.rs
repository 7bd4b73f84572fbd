//! Server settings loaded via OrthoConfig and the resolved server
//! configuration handed to [`super::create_server`].

use std::io;
use std::net::SocketAddr;

use chrono::Duration;
use helpdesk::domain::RoleSource;
use helpdesk::outbound::persistence::DbPool;
use helpdesk::state_builders::ServiceOptions;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;
use zeroize::Zeroizing;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24 * 7;

/// Values controlling the HTTP server, read from `HELPDESK_*` variables,
/// configuration files and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HELPDESK")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Without one the server keeps its data in
    /// memory.
    pub database_url: Option<String>,
    /// HMAC secret used to sign bearer tokens.
    pub jwt_secret: Option<String>,
    /// Token lifetime in hours.
    pub token_ttl_hours: Option<i64>,
    /// Take the actor's role from the token instead of the user store.
    #[ortho_config(default = false)]
    pub trust_token_role: bool,
    /// Record a `ticket_updated` activity entry on field edits.
    #[ortho_config(default = true)]
    pub audit_ticket_updates: bool,
    /// Include internal failure messages in error responses.
    #[ortho_config(default = false)]
    pub expose_error_details: bool,
}

impl ServerSettings {
    /// Parse the bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`io::ErrorKind::InvalidInput`] when the address does not parse.
    pub fn bind_addr(&self) -> io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid bind address {raw:?}: {err}"),
            )
        })
    }

    /// Token lifetime, falling back to one week.
    ///
    /// # Errors
    /// Rejects lifetimes that are not positive.
    pub fn token_ttl(&self) -> io::Result<Duration> {
        let hours = self.token_ttl_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS);
        if hours <= 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("token lifetime must be positive, got {hours} hours"),
            ));
        }
        Ok(Duration::hours(hours))
    }

    /// Resolve the signing secret.
    ///
    /// Debug builds without a configured secret sign with a random one so a
    /// developer can start the server with no setup; tokens do not survive a
    /// restart.
    ///
    /// # Errors
    /// Release builds refuse to start without a secret.
    pub fn jwt_secret(&self) -> io::Result<Zeroizing<Vec<u8>>> {
        match self.jwt_secret.as_deref() {
            Some(secret) if !secret.is_empty() => Ok(Zeroizing::new(secret.as_bytes().to_vec())),
            _ if cfg!(debug_assertions) => {
                warn!("HELPDESK_JWT_SECRET unset; using an ephemeral signing secret (dev only)");
                let secret = format!(
                    "{}{}",
                    Uuid::new_v4().simple(),
                    Uuid::new_v4().simple()
                );
                Ok(Zeroizing::new(secret.into_bytes()))
            }
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "HELPDESK_JWT_SECRET must be set",
            )),
        }
    }

    /// Behavioural switches for the domain services.
    pub fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            role_source: if self.trust_token_role {
                RoleSource::Token
            } else {
                RoleSource::Store
            },
            audit_ticket_updates: self.audit_ticket_updates,
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt_secret: Zeroizing<Vec<u8>>,
    pub(crate) token_ttl: Duration,
    pub(crate) options: ServiceOptions,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration backed by the in-memory store.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        jwt_secret: Zeroizing<Vec<u8>>,
        token_ttl: Duration,
        options: ServiceOptions,
    ) -> Self {
        Self {
            bind_addr,
            jwt_secret,
            token_ttl,
            options,
            db_pool: None,
        }
    }

    /// Attach a database connection pool; repositories then use PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
