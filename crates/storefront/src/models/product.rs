//! Product domain types.

use serde::{Deserialize, Serialize};

use shop2_core::{Quantity, Rating};

/// A purchasable catalog entry.
///
/// Everything except the quantity is fixed when the catalog is built. The
/// quantity is only changed through [`crate::catalog::Catalog`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    image: String,
    description: String,
    quantity: Quantity,
    rating: Rating,
}

impl Product {
    /// Create a product.
    #[must_use]
    pub fn new(
        image: impl Into<String>,
        description: impl Into<String>,
        quantity: Quantity,
        rating: Option<Rating>,
    ) -> Self {
        Self {
            image: image.into(),
            description: description.into(),
            quantity,
            rating: rating.unwrap_or_default(),
        }
    }

    /// Image locator, passed through to the renderer untouched.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Display text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Current quantity.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Review score (3.5 when the product was never rated).
    #[must_use]
    pub const fn rating(&self) -> Rating {
        self.rating
    }

    pub(crate) const fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
    }
}

/// A catalog entry as written in a seed file.
///
/// ```yaml
/// - image: ./products/mug.jpg
///   description: Unique Mug
///   quantity: 3
///   rating: 4.5
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductSeed {
    /// Image locator.
    pub image: String,
    /// Display text.
    pub description: String,
    /// Starting quantity; negative values clamp to zero.
    #[serde(default)]
    pub quantity: i64,
    /// Optional review score.
    #[serde(default)]
    pub rating: Option<Rating>,
}

impl From<ProductSeed> for Product {
    fn from(seed: ProductSeed) -> Self {
        Self::new(
            seed.image,
            seed.description,
            Quantity::from_signed(seed.quantity),
            seed.rating,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_rating_defaults() {
        let product = Product::new("./mug.jpg", "Mug", Quantity::new(1), None);
        assert_eq!(product.rating(), Rating::DEFAULT);
    }

    #[test]
    fn test_seed_clamps_negative_quantity() {
        let seed: ProductSeed =
            serde_json::from_str(r#"{"image": "a.jpg", "description": "A", "quantity": -3}"#)
                .unwrap();
        let product = Product::from(seed);
        assert_eq!(product.quantity(), Quantity::ZERO);
    }

    #[test]
    fn test_seed_rejects_bad_rating() {
        let result = serde_json::from_str::<ProductSeed>(
            r#"{"image": "a.jpg", "description": "A", "rating": 7}"#,
        );
        assert!(result.is_err());
    }
}
