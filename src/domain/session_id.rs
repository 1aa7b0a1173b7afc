//! Type-safe session identifier.
//!
//! [`SessionId`] is a newtype wrapper around [`uuid::Uuid`] (v4). One is
//! minted for every upgraded connection, whether or not it is admitted.

use std::fmt;

/// Identity of one peer session.
///
/// Used as the membership key in [`super::SessionRegistry`] and as the
/// sender discriminator during broadcast, so a session never receives its
/// own frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    /// Creates a new random `SessionId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
