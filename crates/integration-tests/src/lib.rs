//! Integration tests for Shop 2.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shop2-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - local sign-in, cart clearing, logout
//! - `provider_handshake` - social login through the event loop, stale callbacks
//! - `properties` - quantity and cart projection invariants under random edits
//!
//! Everything runs in-process against [`OfflineProvider`]; no network or
//! external services are needed.

use shop2_core::{ProductIndex, Quantity};
use shop2_storefront::catalog::Catalog;
use shop2_storefront::config::ProviderConfig;
use shop2_storefront::identity::{OfflineProvider, OfflineProviderConfig};
use shop2_storefront::models::Product;
use shop2_storefront::notify::RecordingNotifier;
use shop2_storefront::{AppState, Storefront};

/// App id used by every test storefront.
pub const TEST_APP_ID: &str = "1234567890";

/// Storefront wired to an offline provider and a recording notifier.
pub type TestStorefront = Storefront<OfflineProvider, RecordingNotifier>;

/// Catalog of `(description, quantity)` pairs with placeholder images.
///
/// # Panics
///
/// Panics if `items` is empty.
#[must_use]
#[allow(clippy::expect_used)]
pub fn catalog(items: &[(&str, u32)]) -> Catalog {
    Catalog::new(
        items
            .iter()
            .map(|(description, quantity)| {
                Product::new(
                    format!("./products/{}.jpg", description.to_lowercase()),
                    *description,
                    Quantity::new(*quantity),
                    None,
                )
            })
            .collect(),
    )
    .expect("test catalog must not be empty")
}

/// Current quantities, in catalog order.
#[must_use]
pub fn quantities(storefront: &TestStorefront) -> Vec<u32> {
    storefront
        .state()
        .catalog()
        .products()
        .iter()
        .map(|product| product.quantity().get())
        .collect()
}

/// Shorthand for a product position.
#[must_use]
pub const fn at(index: usize) -> ProductIndex {
    ProductIndex::new(index)
}

/// Builds a [`TestStorefront`].
#[derive(Debug, Clone)]
pub struct StorefrontBuilder {
    catalog: Catalog,
    provider: OfflineProviderConfig,
    app_id: Option<String>,
}

impl Default for StorefrontBuilder {
    fn default() -> Self {
        Self {
            catalog: Catalog::seed(),
            provider: OfflineProviderConfig::default(),
            app_id: Some(TEST_APP_ID.to_string()),
        }
    }
}

impl StorefrontBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub fn provider(mut self, provider: OfflineProviderConfig) -> Self {
        self.provider = provider;
        self
    }

    /// Leave the provider app id unset.
    #[must_use]
    pub fn without_app_id(mut self) -> Self {
        self.app_id = None;
        self
    }

    /// Build the storefront and hand back the notifier that records for it.
    #[must_use]
    pub fn build(self) -> (TestStorefront, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let config = ProviderConfig {
            app_id: self.app_id,
            ..ProviderConfig::default()
        };
        let storefront = Storefront::new(
            AppState::new(self.catalog),
            OfflineProvider::new(self.provider),
            &config,
            notifier.clone(),
        );
        (storefront, notifier)
    }
}
