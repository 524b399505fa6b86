//! Newtype IDs for type-safe references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing a catalog position with a login attempt counter.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around an unsigned integer with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `Default`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - Conversion methods: `new()`, `get()`
/// - `From<inner>` and `Into<inner>` implementations
///
/// # Example
///
/// ```rust
/// # use shop2_core::define_id;
/// define_id!(ShelfIndex, usize);
/// define_id!(RequestId, u64);
///
/// let shelf = ShelfIndex::new(1);
/// let request = RequestId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ShelfIndex = request;
/// assert_eq!(shelf.get(), 1);
/// assert_eq!(request.get(), 1);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $inner:ty) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            Default,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name($inner);

        impl $name {
            /// Create a new ID from its raw value.
            #[must_use]
            pub const fn new(id: $inner) -> Self {
                Self(id)
            }

            /// Get the underlying raw value.
            #[must_use]
            pub const fn get(&self) -> $inner {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            fn from(id: $inner) -> Self {
                Self(id)
            }
        }

        impl From<$name> for $inner {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Position of a product in the catalog. Catalog order never changes, so the
// position is the product's identity for the lifetime of a session.
define_id!(ProductIndex, usize);

define_id!(AuthAttemptId, u64);

impl AuthAttemptId {
    /// The attempt that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}
