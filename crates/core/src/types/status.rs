//! Status enums for the storefront session.

use serde::{Deserialize, Serialize};

/// Which screen the session is on.
///
/// A session starts in [`SessionPhase::Shopping`] and only enters
/// [`SessionPhase::Authenticating`] through a checkout with a non-empty cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Browsing the catalog and editing quantities.
    #[default]
    Shopping,
    /// Signing in before checkout completes.
    Authenticating,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shopping => write!(f, "shopping"),
            Self::Authenticating => write!(f, "authenticating"),
        }
    }
}

impl std::str::FromStr for SessionPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shopping" => Ok(Self::Shopping),
            "authenticating" => Ok(Self::Authenticating),
            _ => Err(format!("Invalid session phase: {s}")),
        }
    }
}

/// Login status reported by the identity provider.
///
/// Maps to the provider's `status` callback field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProviderLoginStatus {
    /// Logged into the provider and the app is authorized.
    Connected,
    /// Logged into the provider but the app is not authorized.
    NotAuthorized,
    /// Not logged into the provider, or unknown.
    #[default]
    #[serde(other)]
    Unknown,
}

impl ProviderLoginStatus {
    /// Whether the provider already has an authorized session for this app.
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}
