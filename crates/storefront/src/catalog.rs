//! Catalog store.
//!
//! The catalog is a fixed, ordered list of products built once per session.
//! Products are never added or removed; only their quantities change. A
//! product's position is its identity.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use shop2_core::{ProductIndex, Quantity};

use crate::models::{Product, ProductSeed};

/// A quantity edit addressed a product that does not exist.
///
/// This is a caller bug, not something a shopper can trigger from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("product index {index} out of range (catalog has {len} products)")]
pub struct CatalogError {
    /// The rejected index.
    pub index: ProductIndex,
    /// Number of products in the catalog.
    pub len: usize,
}

/// Errors building a catalog from seed data.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The seed data has no products.
    #[error("catalog must contain at least one product")]
    Empty,

    /// The seed file could not be read.
    #[error("failed to read catalog file {path}: {source}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The seed file is not valid JSON.
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The seed file is not valid YAML.
    #[error("invalid catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// The products on offer and how many of each the shopper wants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from products.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Empty` if `products` is empty.
    pub fn new(products: Vec<Product>) -> Result<Self, SeedError> {
        if products.is_empty() {
            return Err(SeedError::Empty);
        }
        Ok(Self { products })
    }

    /// The catalog the page ships with.
    #[must_use]
    pub fn seed() -> Self {
        let products = vec![
            Product::new(
                "./products/cologne.jpg",
                "Unisex Cologne",
                Quantity::new(2),
                None,
            ),
            Product::new(
                "./products/iwatch.jpg",
                "Apple iWatch",
                Quantity::new(1),
                None,
            ),
            Product::new("./products/mug.jpg", "Unique Mug", Quantity::new(3), None),
            Product::new("./products/wallet.jpg", "Mens Wallet", Quantity::ZERO, None),
        ];
        Self { products }
    }

    /// Build a catalog from seed records.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Empty` if there are no records.
    pub fn from_seeds(seeds: Vec<ProductSeed>) -> Result<Self, SeedError> {
        Self::new(seeds.into_iter().map(Product::from).collect())
    }

    /// Load a catalog from a seed file.
    ///
    /// Files ending in `.json` are read as JSON; anything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds no
    /// products.
    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let seeds: Vec<ProductSeed> = if is_json {
            serde_json::from_str(&contents)?
        } else {
            serde_yaml::from_str(&contents)?
        };

        let catalog = Self::from_seeds(seeds)?;
        tracing::info!(path = %path.display(), products = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Always false for a constructed catalog; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products paired with their positions.
    pub fn iter(&self) -> impl Iterator<Item = (ProductIndex, &Product)> {
        self.products
            .iter()
            .enumerate()
            .map(|(i, product)| (ProductIndex::new(i), product))
    }

    /// Look up a product.
    #[must_use]
    pub fn get(&self, index: ProductIndex) -> Option<&Product> {
        self.products.get(index.get())
    }

    /// Look up a product that must exist.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if `index` is out of range.
    pub fn product(&self, index: ProductIndex) -> Result<&Product, CatalogError> {
        self.get(index).ok_or_else(|| self.out_of_range(index))
    }

    /// Overwrite a product's quantity.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if `index` is out of range.
    pub fn set_quantity(
        &mut self,
        index: ProductIndex,
        quantity: Quantity,
    ) -> Result<(), CatalogError> {
        let err = self.out_of_range(index);
        let product = self.products.get_mut(index.get()).ok_or(err)?;
        product.set_quantity(quantity);
        Ok(())
    }

    /// Overwrite a product's quantity from a signed value, clamping negatives
    /// to zero.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if `index` is out of range.
    pub fn set_quantity_clamped(
        &mut self,
        index: ProductIndex,
        value: i64,
    ) -> Result<(), CatalogError> {
        self.set_quantity(index, Quantity::from_signed(value))
    }

    /// Add one to a product's quantity. Returns the new quantity.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if `index` is out of range.
    pub fn increment(&mut self, index: ProductIndex) -> Result<Quantity, CatalogError> {
        let next = self.product(index)?.quantity().incremented();
        self.set_quantity(index, next)?;
        Ok(next)
    }

    /// Remove one from a product's quantity, stopping at zero. Returns the
    /// new quantity.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if `index` is out of range.
    pub fn decrement(&mut self, index: ProductIndex) -> Result<Quantity, CatalogError> {
        let next = self.product(index)?.quantity().decremented();
        self.set_quantity(index, next)?;
        Ok(next)
    }

    /// Sum of all quantities, recomputed on every call.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.products
            .iter()
            .map(|p| u64::from(p.quantity().get()))
            .sum()
    }

    /// Set every quantity to zero.
    pub fn clear_quantities(&mut self) {
        for product in &mut self.products {
            product.set_quantity(Quantity::ZERO);
        }
    }

    fn out_of_range(&self, index: ProductIndex) -> CatalogError {
        CatalogError {
            index,
            len: self.products.len(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seed()
    }
}
