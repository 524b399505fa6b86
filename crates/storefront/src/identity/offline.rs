//! In-process identity provider.
//!
//! Behaves like the live provider according to a fixed script: whether the
//! client library loads, whether the shopper is already connected, how the
//! login prompt ends, what profile comes back. No network is involved.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::{
    IdentityProvider, InitOptions, LoginOptions, LoginStatusResponse, PROFILE_PATH, ProviderError,
};

/// How the interactive login prompt ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfflineLogin {
    /// The shopper authorizes the app.
    #[default]
    Accept,
    /// The shopper closes the prompt.
    Cancel,
    /// The provider reports an error (see [`OfflineProviderConfig::login_error`]).
    Fail,
}

/// Profile returned from `/me`. Missing fields are left out of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OfflineProfile {
    /// `name`
    pub name: Option<String>,
    /// `email`
    pub email: Option<String>,
    /// `picture.data.url`
    pub picture: Option<String>,
}

impl Default for OfflineProfile {
    fn default() -> Self {
        Self {
            name: Some("Demo Shopper".to_string()),
            email: Some("shopper@example.com".to_string()),
            picture: None,
        }
    }
}

/// Script for an [`OfflineProvider`].
///
/// ```yaml
/// available: true
/// connected: false
/// login: accept        # or: cancel, fail
/// login_error: popup blocked
/// profile:
///   name: Ada Lovelace
///   email: ada@example.com
/// logout_error: ~
/// latency_ms: 0
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OfflineProviderConfig {
    /// Whether `init` succeeds.
    pub available: bool,
    /// Whether the shopper starts out with an authorized provider session.
    pub connected: bool,
    /// Outcome of the login prompt.
    pub login: OfflineLogin,
    /// Error message reported when `login` is `fail`.
    pub login_error: String,
    /// Profile payload.
    pub profile: OfflineProfile,
    /// When set, `logout` fails with this message.
    pub logout_error: Option<String>,
    /// Delay applied to every call, in milliseconds.
    pub latency_ms: u64,
}

impl Default for OfflineProviderConfig {
    fn default() -> Self {
        Self {
            available: true,
            connected: false,
            login: OfflineLogin::Accept,
            login_error: "provider login failed".to_string(),
            profile: OfflineProfile::default(),
            logout_error: None,
            latency_ms: 0,
        }
    }
}

/// A provider call, as recorded by [`OfflineProvider::calls`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    Init,
    GetLoginStatus,
    Login,
    Api(String),
    Logout,
}

/// Scripted stand-in for the live identity provider.
#[derive(Debug)]
pub struct OfflineProvider {
    config: OfflineProviderConfig,
    connected: AtomicBool,
    calls: Mutex<Vec<ProviderCall>>,
}

impl OfflineProvider {
    /// Create a provider following `config`.
    #[must_use]
    pub fn new(config: OfflineProviderConfig) -> Self {
        let connected = AtomicBool::new(config.connected);
        Self {
            config,
            connected,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Whether the provider currently considers the shopper connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn record(&self, call: ProviderCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    async fn delay(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }
    }

    fn status(&self) -> Result<LoginStatusResponse, ProviderError> {
        let payload = if self.is_connected() {
            json!({
                "status": "connected",
                "authResponse": {
                    "accessToken": "offline-access-token",
                    "userID": "offline-user",
                    "expiresIn": 3600,
                    "grantedScopes": super::LOGIN_SCOPES,
                }
            })
        } else {
            json!({ "status": "unknown" })
        };
        Ok(serde_json::from_value(payload)?)
    }

    fn profile_payload(&self, fields: &[&str]) -> Value {
        let profile = &self.config.profile;
        let mut payload = Map::new();
        for field in fields {
            match *field {
                "name" => {
                    if let Some(name) = &profile.name {
                        payload.insert("name".to_string(), json!(name));
                    }
                }
                "email" => {
                    if let Some(email) = &profile.email {
                        payload.insert("email".to_string(), json!(email));
                    }
                }
                "picture" => {
                    if let Some(url) = &profile.picture {
                        payload.insert("picture".to_string(), json!({ "data": { "url": url } }));
                    }
                }
                _ => {}
            }
        }
        Value::Object(payload)
    }
}

impl IdentityProvider for OfflineProvider {
    async fn init(&self, app_id: &str, options: &InitOptions) -> Result<(), ProviderError> {
        self.record(ProviderCall::Init);
        self.delay().await;
        if !self.config.available {
            return Err(ProviderError::Unavailable(
                "provider client library failed to load".to_string(),
            ));
        }
        tracing::debug!(app_id, version = %options.version, "Offline provider initialized");
        Ok(())
    }

    async fn get_login_status(&self) -> Result<LoginStatusResponse, ProviderError> {
        self.record(ProviderCall::GetLoginStatus);
        self.delay().await;
        self.status()
    }

    async fn login(&self, options: &LoginOptions) -> Result<LoginStatusResponse, ProviderError> {
        self.record(ProviderCall::Login);
        self.delay().await;
        tracing::debug!(scope = %options.scope, "Offline provider login prompt");
        match &self.config.login {
            OfflineLogin::Accept => self.connected.store(true, Ordering::SeqCst),
            OfflineLogin::Cancel => {}
            OfflineLogin::Fail => {
                return Err(ProviderError::Failed(self.config.login_error.clone()));
            }
        }
        self.status()
    }

    async fn api(&self, path: &str, fields: &[&str]) -> Result<Value, ProviderError> {
        self.record(ProviderCall::Api(path.to_string()));
        self.delay().await;
        if !self.is_connected() {
            return Err(ProviderError::Failed("not logged in".to_string()));
        }
        if path != PROFILE_PATH {
            return Err(ProviderError::Failed(format!("unknown path {path}")));
        }
        Ok(self.profile_payload(fields))
    }

    async fn logout(&self) -> Result<(), ProviderError> {
        self.record(ProviderCall::Logout);
        self.delay().await;
        self.connected.store(false, Ordering::SeqCst);
        self.config
            .logout_error
            .as_ref()
            .map_or(Ok(()), |reason| Err(ProviderError::Failed(reason.clone())))
    }
}
