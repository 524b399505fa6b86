//! Identity provider error types.

use thiserror::Error;

/// Errors that can occur while talking to the identity provider.
///
/// None of these are fatal: the session stays where it was and the shopper
/// can simply try again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider library could not be loaded or initialized.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    /// The shopper closed the login prompt or did not authorize the app.
    #[error("login cancelled")]
    Cancelled,

    /// The provider reported a failure.
    #[error("{0}")]
    Failed(String),

    /// A callback payload did not have the documented shape.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// The profile lacks a field the storefront needs.
    #[error("provider profile is missing {0}")]
    IncompleteProfile(&'static str),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}
