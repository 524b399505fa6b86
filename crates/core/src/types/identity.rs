//! Signed-in shopper identity.

use core::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use super::email::Email;

/// Errors that can occur when parsing a [`DisplayName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DisplayNameError {
    /// The input string is empty (or only whitespace).
    #[error("name cannot be empty")]
    Empty,
}

/// A shopper's display name, trimmed and non-empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// Parse a `DisplayName` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty.
    pub fn parse(s: &str) -> Result<Self, DisplayNameError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DisplayNameError::Empty);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a [`UserIdentity`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    /// The local sign-in form (trust-on-submit).
    LocalForm,
    /// The third-party identity provider.
    Provider,
}

/// The shopper recorded by a successful sign-in.
///
/// Lives only in memory for the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Display name.
    pub name: DisplayName,
    /// Email address.
    pub email: Email,
    /// Profile picture, only known for provider sign-ins.
    pub picture: Option<Url>,
    /// Which sign-in path produced this identity.
    pub source: IdentitySource,
}

impl UserIdentity {
    /// Identity produced by the local sign-in form. Never carries a picture.
    #[must_use]
    pub const fn local(name: DisplayName, email: Email) -> Self {
        Self {
            name,
            email,
            picture: None,
            source: IdentitySource::LocalForm,
        }
    }

    /// Identity reported by the identity provider.
    #[must_use]
    pub const fn from_provider(name: DisplayName, email: Email, picture: Option<Url>) -> Self {
        Self {
            name,
            email,
            picture,
            source: IdentitySource::Provider,
        }
    }
}
