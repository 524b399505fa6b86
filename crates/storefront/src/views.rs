//! Read-only snapshots for the rendering layer.
//!
//! A view is built from [`AppState`] in one pass and owns its data, so the
//! renderer can hold on to it while the session moves on.

use serde::Serialize;

use shop2_core::{ProductIndex, Quantity, Rating, SessionPhase, UserIdentity};

use crate::cart::{CartLine, CheckoutSummary};
use crate::controller::AppState;

/// Everything the page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorefrontView {
    /// Header badge text, e.g. `"3 items"`.
    pub header: String,
    pub total_items: u64,
    pub products: Vec<ProductView>,
    pub cart: CartView,
    pub selection: SelectionView,
    pub session: SessionView,
}

/// One catalog tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    pub index: ProductIndex,
    pub image: String,
    pub description: String,
    pub quantity: Quantity,
    pub rating: Rating,
}

/// The cart panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total_items: u64,
    /// Whether the checkout button does anything.
    pub can_checkout: bool,
}

/// The product detail overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionView {
    pub open: bool,
    /// The inspected product, when the overlay is open.
    pub product: Option<ProductView>,
}

/// Sign-in state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub identity: Option<UserIdentity>,
    pub provider_login_pending: bool,
    pub last_checkout: Option<CheckoutSummary>,
}

impl StorefrontView {
    /// Snapshot the whole session.
    #[must_use]
    pub fn capture(state: &AppState) -> Self {
        let products: Vec<ProductView> = state
            .catalog()
            .iter()
            .map(|(index, product)| ProductView {
                index,
                image: product.image().to_owned(),
                description: product.description().to_owned(),
                quantity: product.quantity(),
                rating: product.rating(),
            })
            .collect();

        let cart = state.cart();
        let total_items = state.total_items();
        let selected = state
            .selection()
            .product()
            .and_then(|index| products.iter().find(|p| p.index == index).cloned());
        let session = state.session();

        Self {
            header: header_text(total_items),
            total_items,
            cart: CartView {
                lines: cart.lines().to_vec(),
                total_items: cart.total_items(),
                can_checkout: !cart.is_empty() && session.phase() == SessionPhase::Shopping,
            },
            selection: SelectionView {
                open: state.selection().is_open(),
                product: selected,
            },
            session: SessionView {
                phase: session.phase(),
                identity: session.identity().cloned(),
                provider_login_pending: session.provider_login_pending(),
                last_checkout: session.last_checkout().cloned(),
            },
            products,
        }
    }
}

fn header_text(total_items: u64) -> String {
    format!("{total_items} items")
}
