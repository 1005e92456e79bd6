//! Integration tests for the Click Me storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p click-me-integration-tests
//! ```
//!
//! # Test Files
//!
//! - `storefront_catalog` - Filtering, sorting and pagination over the seed catalog
//! - `storefront_cart` - Cart mutations, persistence and rehydration
//! - `storefront_contact` - Validation, drafts and submission
//!
//! Tests drive the public library API only. File-backed storage runs in a
//! temporary directory.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use click_me_storefront::AppState;
use click_me_storefront::config::StorefrontConfig;
use click_me_storefront::storage::{FileStorage, KeyValueStore};
use tempfile::TempDir;

/// Application state persisted to a fresh temporary directory.
///
/// Keep the returned `TempDir` alive for as long as the state is used.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
#[allow(clippy::expect_used)]
pub fn file_backed_state() -> (TempDir, Arc<dyn KeyValueStore>, AppState) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let storage: Arc<dyn KeyValueStore> =
        Arc::new(FileStorage::open(dir.path()).expect("open file storage"));
    let config = StorefrontConfig {
        data_dir: dir.path().to_path_buf(),
        ..StorefrontConfig::default()
    };
    let state = AppState::new(config, storage.clone());
    (dir, storage, state)
}
