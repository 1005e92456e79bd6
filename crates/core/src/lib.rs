//! Click Me Core - Shared types library.
//!
//! This crate provides common types used across all Click Me components:
//! - `storefront` - Catalog queries, cart, contact drafts and validation
//! - `cli` - Command-line presentation of the storefront
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and categories

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
