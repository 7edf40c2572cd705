//! Typed identifier for user identities.
//!
//! Identities in Pingboard are usernames: the registration flow uses the
//! username itself as the stable identifier, so [`UserId`] wraps a `String`
//! rather than a UUID. The newtype prevents accidentally passing an
//! arbitrary string where an authenticated identity is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a user.
///
/// Ordered and hashable so identity sets can be kept in sorted containers
/// and presence snapshots come out in a deterministic order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create an identifier from a username.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identifier, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&str> for UserId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> String {
        id.0
    }
}
