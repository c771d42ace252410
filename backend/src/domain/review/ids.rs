//! Opaque storage-assigned identifiers.
//!
//! Identifiers are generated by storage adapters and treated as opaque text by
//! the domain. The only rule is that they are non-empty and carry no
//! surrounding whitespace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors for opaque identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// The identifier was empty.
    #[error("{kind} id must not be empty")]
    Empty {
        /// Which identifier failed validation.
        kind: &'static str,
    },
    /// The identifier had leading or trailing whitespace.
    #[error("{kind} id must not contain surrounding whitespace")]
    Padded {
        /// Which identifier failed validation.
        kind: &'static str,
    },
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap a raw identifier.
            pub fn new(id: impl Into<String>) -> Result<Self, IdValidationError> {
                let raw = id.into();
                if raw.is_empty() {
                    return Err(IdValidationError::Empty { kind: $kind });
                }
                if raw.trim() != raw {
                    return Err(IdValidationError::Padded { kind: $kind });
                }
                Ok(Self(raw))
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

opaque_id!(
    /// Identifier of a persisted [`super::Review`].
    ReviewId,
    "review"
);

opaque_id!(
    /// Identifier of a stored cover image.
    ImageId,
    "image"
);
