//! UUID-backed entity identifiers.
//!
//! Each entity gets its own newtype so a ticket id can never be passed where
//! a user id is expected. Parsing is strict: surrounding whitespace and
//! non-UUID text are rejected before any lookup is attempted.

/// Raised when an identifier string is not a well-formed UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identifier must be a valid UUID")]
pub struct IdentifierError;

macro_rules! define_identifier {
    ($(#[$outer:meta])* $name:ident) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(::serde::Serialize, ::serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Parse an identifier from its textual form.
            pub fn new(id: impl AsRef<str>) -> Result<Self, $crate::domain::IdentifierError> {
                let raw = id.as_ref();
                if raw.is_empty() || raw.trim() != raw {
                    return Err($crate::domain::IdentifierError);
                }
                ::uuid::Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| $crate::domain::IdentifierError)
            }

            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

define_identifier! {
    /// Stable user identifier.
    UserId
}

define_identifier! {
    /// Stable ticket identifier.
    TicketId
}

define_identifier! {
    /// Stable comment identifier.
    CommentId
}

define_identifier! {
    /// Identifier of one audit entry.
    ActivityId
}
