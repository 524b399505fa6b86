//! Show the starting catalog.

use shop2_storefront::AppState;
use shop2_storefront::config::StorefrontConfig;
use shop2_storefront::views::StorefrontView;

use super::{CommandError, print_json};

/// Print the products a new session starts with.
///
/// # Errors
///
/// Returns an error if the configured seed catalog cannot be loaded.
pub fn show(config: &StorefrontConfig) -> Result<(), CommandError> {
    let catalog = config.load_catalog()?;
    tracing::info!(products = catalog.len(), "Catalog loaded");
    let view = StorefrontView::capture(&AppState::new(catalog));
    print_json(&view.products)
}
