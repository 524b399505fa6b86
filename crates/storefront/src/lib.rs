//! Shop 2 Storefront library.
//!
//! Holds exactly one shopping session in memory: the catalog and its
//! quantities, the derived cart, the product detail overlay, and the
//! checkout sign-in flow. Rendering is somebody else's job; this crate hands
//! out read-only [`views`] and accepts [`controller::Event`]s.
//!
//! # Layers
//!
//! - [`catalog`], [`cart`], [`selection`] - leaf stores and projections
//! - [`controller`] - explicit state plus a pure `reduce(state, event)`
//! - [`identity`] - identity provider capability and sign-in handshake
//! - [`event_loop`] - serializes events and runs effects to completion

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod event_loop;
pub mod identity;
pub mod models;
pub mod notify;
pub mod selection;
pub mod views;

pub use controller::{AppState, Effect, Event, Transition, reduce};
pub use event_loop::Storefront;
