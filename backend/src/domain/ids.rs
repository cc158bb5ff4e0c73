//! UUID-backed identifiers for users, tickets, and activities.
//!
//! Identifiers are generated server-side with [`uuid::Uuid::new_v4`] and are
//! never accepted from callers on creation.

use std::fmt;

/// Error returned when identifier text is not a UUID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdentifierError {
    pub kind: &'static str,
    pub input: String,
}

impl fmt::Display for ParseIdentifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} id must be a valid UUID: {}", self.kind, self.input)
    }
}

impl std::error::Error for ParseIdentifierError {}

macro_rules! define_identifier {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseIdentifierError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(value)
                    .map(Self)
                    .map_err(|_| ParseIdentifierError {
                        kind: $kind,
                        input: value.to_owned(),
                    })
            }
        }
    };
}

define_identifier!(
    /// Stable user identifier owned by the user directory.
    UserId,
    "user"
);
define_identifier!(
    /// Server-generated ticket identifier.
    TicketId,
    "ticket"
);
define_identifier!(
    /// Server-generated activity identifier.
    ActivityId,
    "activity"
);
