//! Shop 2 Core - Shared types library.
//!
//! This crate provides common types used across all Shop 2 components:
//! - `storefront` - The single-session storefront state machine
//! - `cli` - Command-line driver that replays storefront sessions
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no provider
//! clients, no event loop. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for indexes, quantities, ratings, emails,
//!   identities and session phases

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
