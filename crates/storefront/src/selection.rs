//! Product detail overlay.
//!
//! Tracks which product (if any) is open in the detail overlay. Selection is
//! independent of the cart: a product with zero quantity can be inspected,
//! and quantity edits do not touch the overlay.

use serde::{Deserialize, Serialize};

use shop2_core::ProductIndex;

/// Where a click inside the open overlay landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayClick {
    /// The dimmed area around the panel. Closes the overlay.
    Backdrop,
    /// The panel content. Does nothing.
    Panel,
}

/// Overlay state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    product: Option<ProductIndex>,
    open: bool,
}

impl Selection {
    /// Open the overlay on a product.
    pub const fn select(&mut self, index: ProductIndex) {
        self.product = Some(index);
        self.open = true;
    }

    /// Close the overlay and forget the product.
    pub const fn close(&mut self) {
        self.product = None;
        self.open = false;
    }

    /// Handle a click while the overlay is showing. Returns whether the
    /// overlay closed.
    pub const fn click(&mut self, target: OverlayClick) -> bool {
        match target {
            OverlayClick::Backdrop if self.open => {
                self.close();
                true
            }
            OverlayClick::Backdrop | OverlayClick::Panel => false,
        }
    }

    /// The product being inspected.
    #[must_use]
    pub const fn product(&self) -> Option<ProductIndex> {
        self.product
    }

    /// Whether the overlay is showing.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }
}
