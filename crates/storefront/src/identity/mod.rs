//! Identity provider capability.
//!
//! The storefront consumes a third-party social login; it does not implement
//! one. Everything it needs from the provider is the five operations on
//! [`IdentityProvider`], which mirror the provider's client library:
//!
//! 1. `init(appId, options)` once before first use
//! 2. `getLoginStatus()` to reuse an existing authorization
//! 3. `login({scope, return_scopes})` for interactive login
//! 4. `api("/me", {fields})` for the profile
//! 5. `logout()`
//!
//! [`ProviderSession`] chains these into the sign-in handshake. Anything
//! implementing the trait can stand in for the live provider, which is how
//! [`OfflineProvider`] drives the CLI and the tests.

mod error;
mod handshake;
mod offline;
mod types;

pub use error::ProviderError;
pub use handshake::ProviderSession;
pub use offline::{
    OfflineLogin, OfflineProfile, OfflineProvider, OfflineProviderConfig, ProviderCall,
};
pub use types::*;

use std::future::Future;

/// Operations the storefront consumes from the identity provider.
///
/// Each call completes asynchronously, possibly long after it was made.
pub trait IdentityProvider: Send + Sync + 'static {
    /// Load and initialize the provider client for `app_id`.
    fn init(
        &self,
        app_id: &str,
        options: &InitOptions,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Report whether this app already has an authorized provider session.
    fn get_login_status(
        &self,
    ) -> impl Future<Output = Result<LoginStatusResponse, ProviderError>> + Send;

    /// Prompt the shopper to log in.
    fn login(
        &self,
        options: &LoginOptions,
    ) -> impl Future<Output = Result<LoginStatusResponse, ProviderError>> + Send;

    /// Call a provider API path and return the raw JSON payload.
    fn api(
        &self,
        path: &str,
        fields: &[&str],
    ) -> impl Future<Output = Result<serde_json::Value, ProviderError>> + Send;

    /// End the provider session.
    fn logout(&self) -> impl Future<Output = Result<(), ProviderError>> + Send;
}
