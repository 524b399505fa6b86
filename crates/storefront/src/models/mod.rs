//! Domain models for the storefront session.
//!
//! - [`product`] - catalog entries and the seed records they are built from
//! - [`session`] - sign-in state for the single page session

pub mod product;
pub mod session;

pub use product::{Product, ProductSeed};
pub use session::Session;
