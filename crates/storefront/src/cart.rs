//! Cart projection.
//!
//! The cart is not stored anywhere. It is the catalog filtered to products
//! with a positive quantity, recomputed from the catalog whenever it is read.

use core::fmt;

use serde::Serialize;

use shop2_core::{ProductIndex, Quantity};

use crate::catalog::Catalog;

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    /// Position of the product in the catalog.
    pub index: ProductIndex,
    /// Product display text.
    pub description: String,
    /// Product image locator.
    pub image: String,
    /// How many the shopper wants; always positive.
    pub quantity: Quantity,
}

/// The products the shopper currently wants, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Lines in catalog order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether nothing is in the cart.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }
}

/// Derive the cart from the catalog.
///
/// Pure and idempotent: the same catalog always yields an equal cart.
#[must_use]
pub fn project(catalog: &Catalog) -> Cart {
    let lines = catalog
        .iter()
        .filter(|(_, product)| !product.quantity().is_zero())
        .map(|(index, product)| CartLine {
            index,
            description: product.description().to_owned(),
            image: product.image().to_owned(),
            quantity: product.quantity(),
        })
        .collect();
    Cart { lines }
}

/// One `"<description> x <quantity>"` entry of a checkout summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    /// Product display text.
    pub description: String,
    /// Quantity bought.
    pub quantity: Quantity,
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.description, self.quantity)
    }
}

/// What the shopper checked out, captured before the cart is cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSummary {
    /// One entry per cart line, in catalog order.
    pub lines: Vec<SummaryLine>,
    /// Total number of items.
    pub total_items: u64,
}

impl CheckoutSummary {
    /// Snapshot the cart.
    #[must_use]
    pub fn capture(cart: &Cart) -> Self {
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| SummaryLine {
                    description: line.description.clone(),
                    quantity: line.quantity,
                })
                .collect(),
            total_items: cart.total_items(),
        }
    }

    /// The item lines joined with line breaks.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for CheckoutSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\nTotal items: {}", self.text(), self.total_items)
    }
}
