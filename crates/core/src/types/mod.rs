//! Core types for Shop 2.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod identity;
pub mod quantity;
pub mod rating;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use identity::{DisplayName, DisplayNameError, IdentitySource, UserIdentity};
pub use quantity::Quantity;
pub use rating::{Rating, RatingError};
pub use status::*;
