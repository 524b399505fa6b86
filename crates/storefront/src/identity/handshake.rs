//! Provider sign-in handshake.

use tokio::sync::OnceCell;
use tracing::instrument;

use shop2_core::UserIdentity;

use super::{
    IdentityProvider, InitOptions, LoginOptions, PROFILE_FIELDS, PROFILE_PATH, ProfileResponse,
    ProviderError,
};
use crate::config::ProviderConfig;

/// An identity provider bound to this storefront's app registration.
///
/// Initializes the provider lazily, at most once. A failed initialization is
/// not remembered, so the next sign-in tries again.
pub struct ProviderSession<P> {
    provider: P,
    app_id: Option<String>,
    init_options: InitOptions,
    initialized: OnceCell<()>,
}

impl<P: IdentityProvider> ProviderSession<P> {
    /// Bind a provider to the configured app.
    #[must_use]
    pub fn new(provider: P, config: &ProviderConfig) -> Self {
        Self {
            provider,
            app_id: config.app_id.clone(),
            init_options: config.init_options(),
            initialized: OnceCell::new(),
        }
    }

    /// The wrapped provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Whether `init` has succeeded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.initialized()
    }

    /// Run the sign-in handshake and return the shopper's identity.
    ///
    /// Reuses an existing provider authorization when there is one; otherwise
    /// prompts for login with the `email` and `public_profile` scopes.
    ///
    /// # Errors
    ///
    /// - `ProviderError::Unavailable` if the provider cannot be initialized
    /// - `ProviderError::Cancelled` if the shopper did not authorize the app
    /// - any other variant if a call fails or the profile is unusable
    #[instrument(skip(self))]
    pub async fn sign_in(&self) -> Result<UserIdentity, ProviderError> {
        self.ensure_initialized().await?;

        let status = self.provider.get_login_status().await?;
        if status.is_authorized() {
            tracing::debug!("Provider session already connected, skipping login prompt");
        } else {
            let response = self.provider.login(&LoginOptions::default()).await?;
            if !response.is_authorized() {
                return Err(ProviderError::Cancelled);
            }
            if let Some(scopes) = response
                .auth_response
                .as_ref()
                .and_then(|auth| auth.granted_scopes.as_deref())
            {
                tracing::debug!(granted_scopes = scopes, "Provider login authorized");
            }
        }

        self.fetch_profile().await
    }

    /// End the provider session.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if it cannot be initialized or rejects
    /// the logout.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), ProviderError> {
        self.ensure_initialized().await?;
        self.provider.logout().await
    }

    async fn fetch_profile(&self) -> Result<UserIdentity, ProviderError> {
        let payload = self.provider.api(PROFILE_PATH, PROFILE_FIELDS).await?;
        let profile: ProfileResponse = serde_json::from_value(payload)?;
        profile.into_identity()
    }

    async fn ensure_initialized(&self) -> Result<(), ProviderError> {
        let Some(app_id) = self.app_id.as_deref() else {
            let reason = "no provider app id configured".to_string();
            return Err(ProviderError::Unavailable(reason));
        };

        self.initialized
            .get_or_try_init(|| async {
                self.provider
                    .init(app_id, &self.init_options)
                    .await
                    .map_err(|e| match e {
                        ProviderError::Unavailable(_) => e,
                        other => ProviderError::Unavailable(other.to_string()),
                    })?;
                tracing::info!(app_id, "Identity provider initialized");
                Ok::<(), ProviderError>(())
            })
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::identity::{OfflineLogin, OfflineProvider, OfflineProviderConfig, ProviderCall};

    fn config() -> ProviderConfig {
        ProviderConfig {
            app_id: Some("1234567890".to_string()),
            ..ProviderConfig::default()
        }
    }

    #[tokio::test]
    async fn test_fresh_login_fetches_profile() {
        let session = ProviderSession::new(
            OfflineProvider::new(OfflineProviderConfig::default()),
            &config(),
        );
        let identity = session.sign_in().await.unwrap();
        assert_eq!(identity.email.as_str(), "shopper@example.com");
        assert_eq!(
            session.provider().calls(),
            [
                ProviderCall::Init,
                ProviderCall::GetLoginStatus,
                ProviderCall::Login,
                ProviderCall::Api("/me".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_connected_skips_login() {
        let session = ProviderSession::new(
            OfflineProvider::new(OfflineProviderConfig {
                connected: true,
                ..OfflineProviderConfig::default()
            }),
            &config(),
        );
        session.sign_in().await.unwrap();
        assert!(!session.provider().calls().contains(&ProviderCall::Login));
    }

    #[tokio::test]
    async fn test_init_only_once() {
        let session = ProviderSession::new(
            OfflineProvider::new(OfflineProviderConfig::default()),
            &config(),
        );
        session.sign_in().await.unwrap();
        session.sign_out().await.unwrap();
        session.sign_in().await.unwrap();
        let inits = session
            .provider()
            .calls()
            .iter()
            .filter(|c| **c == ProviderCall::Init)
            .count();
        assert_eq!(inits, 1);
    }

    #[tokio::test]
    async fn test_missing_app_id_is_unavailable() {
        let session = ProviderSession::new(
            OfflineProvider::new(OfflineProviderConfig::default()),
            &ProviderConfig::default(),
        );
        assert!(matches!(session.sign_in().await, Err(ProviderError::Unavailable(_))));
        assert!(session.provider().calls().is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_init_is_retried() {
        let session = ProviderSession::new(
            OfflineProvider::new(OfflineProviderConfig {
                available: false,
                ..OfflineProviderConfig::default()
            }),
            &config(),
        );
        assert!(matches!(session.sign_in().await, Err(ProviderError::Unavailable(_))));
        assert!(!session.is_initialized());
        assert!(session.sign_in().await.is_err());
        let inits = session
            .provider()
            .calls()
            .iter()
            .filter(|c| **c == ProviderCall::Init)
            .count();
        assert_eq!(inits, 2);
    }

    #[tokio::test]
    async fn test_cancelled_login() {
        let session = ProviderSession::new(
            OfflineProvider::new(OfflineProviderConfig {
                login: OfflineLogin::Cancel,
                ..OfflineProviderConfig::default()
            }),
            &config(),
        );
        assert_eq!(session.sign_in().await, Err(ProviderError::Cancelled));
    }
}
