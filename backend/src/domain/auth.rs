//! Authentication primitives: login credentials and registrations.
//!
//! Inbound adapters validate raw strings through these constructors before
//! a handler talks to a port.

use super::{EmailAddress, PlainPassword, Role, UserName, UserValidationError};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was blank or not shaped like an address.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed and lowercased.
/// - `password` is non-empty but otherwise kept exactly as typed.
///
/// # Examples
/// ```
/// use helpdesk::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.com", "hunter22").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: PlainPassword,
}

impl LoginCredentials {
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = EmailAddress::new(email).map_err(|_| LoginValidationError::InvalidEmail)?;
        let password =
            PlainPassword::for_login(password).ok_or(LoginValidationError::EmptyPassword)?;
        Ok(Self { email, password })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &PlainPassword {
        &self.password
    }
}

/// Validated self-registration request.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: UserName,
    pub email: EmailAddress,
    pub password: PlainPassword,
    pub role: Role,
}

impl Registration {
    /// Validate the raw fields; the role defaults to client.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            name: UserName::new(name)?,
            email: EmailAddress::new(email)?,
            password: PlainPassword::new(password)?,
            role: role.unwrap_or_default(),
        })
    }
}
