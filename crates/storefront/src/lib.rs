//! Click Me storefront library.
//!
//! Catalog browsing, the filter/sort/paginate pipeline, the persisted
//! shopping cart, and the contact form with validation and draft auto-save.
//! Presentation is left to callers such as the `clickme` CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod contact;
pub mod debounce;
pub mod draft;
pub mod error;
pub mod query;
pub mod reviews;
pub mod state;
pub mod storage;
pub mod validation;

pub use error::{AppError, Result};
pub use state::AppState;
