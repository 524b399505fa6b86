//! Identity provider callback shapes.
//!
//! These mirror the provider's documented payloads field for field, so they
//! use the provider's camelCase names on the wire.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use shop2_core::{DisplayName, Email, ProviderLoginStatus, UserIdentity};

use super::ProviderError;

/// Scopes requested on interactive login.
pub const LOGIN_SCOPES: &str = "email,public_profile";

/// Graph path for the signed-in user's profile.
pub const PROFILE_PATH: &str = "/me";

/// Profile fields fetched after login.
pub const PROFILE_FIELDS: &[&str] = &["name", "email", "picture"];

/// Options passed to the provider's `init` call alongside the app id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitOptions {
    /// Let the provider keep a session cookie.
    pub cookie: bool,
    /// Parse provider markup on the page.
    pub xfbml: bool,
    /// Provider API version, e.g. `v2.8`.
    pub version: String,
}

/// Options passed to the provider's `login` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOptions {
    /// Comma-separated permission scopes.
    pub scope: String,
    /// Ask the provider to report which scopes were granted.
    pub return_scopes: bool,
}

impl Default for LoginOptions {
    fn default() -> Self {
        Self {
            scope: LOGIN_SCOPES.to_string(),
            return_scopes: true,
        }
    }
}

/// Payload of `getLoginStatus` and `login` callbacks.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginStatusResponse {
    /// Whether the app is connected.
    pub status: ProviderLoginStatus,
    /// Present when `status` is `connected`.
    #[serde(default)]
    pub auth_response: Option<AuthResponse>,
}

impl LoginStatusResponse {
    /// A connected response carrying an auth payload.
    #[must_use]
    pub const fn is_authorized(&self) -> bool {
        self.status.is_connected() && self.auth_response.is_some()
    }
}

/// The `authResponse` object of a connected login status.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// Access token for profile calls.
    #[serde(rename = "accessToken", deserialize_with = "deserialize_secret")]
    pub access_token: SecretString,
    /// Provider-side user id.
    #[serde(rename = "userID")]
    pub user_id: String,
    /// Seconds until the token expires.
    #[serde(rename = "expiresIn", default)]
    pub expires_in: Option<u64>,
    /// Comma-separated scopes granted, when `return_scopes` was requested.
    #[serde(rename = "grantedScopes", default)]
    pub granted_scopes: Option<String>,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// Payload of `api("/me", {fields: "name,email,picture"})`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileResponse {
    /// Full name.
    #[serde(default)]
    pub name: Option<String>,
    /// Primary email, absent if the shopper withheld the `email` scope.
    #[serde(default)]
    pub email: Option<String>,
    /// Profile picture wrapper.
    #[serde(default)]
    pub picture: Option<ProfilePicture>,
}

/// `picture` field of a profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePicture {
    /// `picture.data`.
    #[serde(default)]
    pub data: Option<PictureData>,
}

/// `picture.data` field of a profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PictureData {
    /// `picture.data.url`.
    #[serde(default)]
    pub url: Option<String>,
}

impl ProfileResponse {
    /// The raw `picture.data.url`, if present.
    #[must_use]
    pub fn picture_url(&self) -> Option<&str> {
        self.picture
            .as_ref()
            .and_then(|p| p.data.as_ref())
            .and_then(|d| d.url.as_deref())
    }

    /// Build the shopper identity from the profile.
    ///
    /// A picture URL that does not parse is dropped rather than failing the
    /// login.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::IncompleteProfile` if name or email is missing
    /// or blank.
    pub fn into_identity(self) -> Result<UserIdentity, ProviderError> {
        let picture = self.picture_url().and_then(|raw| match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unparsable profile picture URL");
                None
            }
        });

        let name = self
            .name
            .as_deref()
            .and_then(|n| DisplayName::parse(n).ok())
            .ok_or(ProviderError::IncompleteProfile("name"))?;
        let email = self
            .email
            .as_deref()
            .and_then(|e| Email::parse(e).ok())
            .ok_or(ProviderError::IncompleteProfile("email"))?;

        Ok(UserIdentity::from_provider(name, email, picture))
    }
}
