//! Actor roles and the authenticated actor.
//!
//! Roles carry no ranking. What each role may do is decided per action by
//! [`crate::domain::policy::decide`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::UserId;

/// One of the three fixed actor roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Client,
    Technician,
    Admin,
}

impl Role {
    /// Canonical lowercase spelling used on the wire and in storage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Technician => "technician",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when text does not name a known role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {value}")]
pub struct UnknownRole {
    pub value: String,
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "technician" => Ok(Self::Technician),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole {
                value: other.to_owned(),
            }),
        }
    }
}

/// The authenticated identity making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    id: UserId,
    role: Role,
}

impl Actor {
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    pub const fn id(&self) -> &UserId {
        &self.id
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("client", Role::Client)]
    #[case("technician", Role::Technician)]
    #[case("admin", Role::Admin)]
    fn parses_canonical_spelling(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>(), Ok(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    #[case("Admin")]
    #[case("TECHNICIAN")]
    #[case("superuser")]
    fn rejects_other_spellings(#[case] raw: &str) {
        assert!(raw.parse::<Role>().is_err());
    }

    #[rstest]
    fn default_role_is_client() {
        assert_eq!(Role::default(), Role::Client);
    }
}
