//! ElectroStore Core - Shared types library.
//!
//! This crate provides common types used across all ElectroStore client
//! components:
//! - `client` - Store, persistence, and API gateway library
//! - `cli` - Terminal front-end driving the store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, product snapshots, profiles, cart lines, and
//!   the order/review/theme types mirrored from the remote API

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
