//! Application state shared across the presentation layer.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::cart::CartStore;
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::contact::{ContactForm, ContactService};
use crate::debounce::{DebounceHandle, Debouncer};
use crate::draft::DraftStore;
use crate::query::{FilterSpec, PageRequest, QueryPage, query};
use crate::storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError};

/// The listing control whose edit triggers a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingInput {
    /// The search box.
    Search,
    /// Either price bound.
    Price,
}

/// Application state shared across all callers.
///
/// This struct is cheaply cloneable via `Arc`. The cart sits behind an async
/// mutex so at most one cart mutation is in flight.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<Catalog>,
    storage: Arc<dyn KeyValueStore>,
    cart: Mutex<CartStore>,
    drafts: Arc<DraftStore>,
    contact: ContactService,
    search_refresh: Debouncer,
    price_refresh: Debouncer,
    draft_autosave: Debouncer,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .field("products", &self.inner.catalog.len())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create application state over the seed catalog and `storage`.
    ///
    /// The cart is rehydrated from storage immediately.
    #[must_use]
    pub fn new(config: StorefrontConfig, storage: Arc<dyn KeyValueStore>) -> Self {
        Self::with_catalog(config, Arc::new(Catalog::seed()), storage)
    }

    /// Create application state over a custom catalog.
    #[must_use]
    pub fn with_catalog(
        config: StorefrontConfig,
        catalog: Arc<Catalog>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        let cart = CartStore::load(catalog.clone(), storage.clone());
        let drafts = Arc::new(DraftStore::new(storage.clone(), config.draft_ttl));
        let contact = ContactService::new(storage.clone(), drafts.clone(), config.submit_delay);
        let search_refresh = Debouncer::new(config.debounce.search);
        let price_refresh = Debouncer::new(config.debounce.price);
        let draft_autosave = Debouncer::new(config.debounce.draft_autosave);

        tracing::debug!(
            products = catalog.len(),
            cart_lines = cart.lines().len(),
            "Application state initialized"
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                storage,
                cart: Mutex::new(cart),
                drafts,
                contact,
                search_refresh,
                price_refresh,
                draft_autosave,
            }),
        }
    }

    /// Open state persisted under `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the data directory cannot be created.
    pub fn open(config: StorefrontConfig) -> Result<Self, StorageError> {
        let storage = FileStorage::open(config.data_dir.clone())?;
        Ok(Self::new(config, Arc::new(storage)))
    }

    /// State backed by memory only, with default configuration.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(StorefrontConfig::default(), Arc::new(MemoryStorage::new()))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the key-value storage.
    #[must_use]
    pub fn storage(&self) -> &dyn KeyValueStore {
        self.inner.storage.as_ref()
    }

    /// Lock the cart for reading or mutation.
    pub async fn cart(&self) -> MutexGuard<'_, CartStore> {
        self.inner.cart.lock().await
    }

    /// Get a reference to the contact draft store.
    #[must_use]
    pub fn drafts(&self) -> &DraftStore {
        &self.inner.drafts
    }

    /// Get a reference to the contact form service.
    #[must_use]
    pub fn contact(&self) -> &ContactService {
        &self.inner.contact
    }

    /// Debounce a listing refresh after the search box or a price bound changes.
    ///
    /// Once `input` has been quiet for its debounce window, the listing is
    /// re-run from page 1 with `filter` and `on_results` receives the page.
    /// Search and price edits debounce independently. Must be called from
    /// within a tokio runtime.
    pub fn refresh_listing<F>(
        &self,
        input: ListingInput,
        filter: FilterSpec,
        on_results: F,
    ) -> DebounceHandle
    where
        F: FnOnce(&QueryPage<'_>) + Send + 'static,
    {
        let catalog = self.inner.catalog.clone();
        let debouncer = match input {
            ListingInput::Search => &self.inner.search_refresh,
            ListingInput::Price => &self.inner.price_refresh,
        };

        debouncer.schedule(move || {
            let page = query(&catalog, &filter, PageRequest::first());
            tracing::debug!(?input, matched = page.total_count, "Listing refreshed");
            on_results(&page);
        })
    }

    /// Debounce an auto-save of the contact draft.
    ///
    /// Repeated calls within the auto-save window collapse into one write of
    /// the latest form. Must be called from within a tokio runtime.
    pub fn autosave_draft(&self, form: ContactForm) {
        let drafts = self.inner.drafts.clone();
        self.inner.draft_autosave.schedule(move || {
            if let Err(e) = drafts.save(&form) {
                tracing::warn!(error = %e, "Contact draft auto-save failed");
            }
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use click_me_core::ProductId;

    use super::*;
    use crate::storage::keys;

    #[tokio::test]
    async fn test_clones_share_cart() {
        let state = AppState::in_memory();
        let other = state.clone();

        state.cart().await.add(ProductId::new(2), 1).unwrap();
        assert_eq!(other.cart().await.count(), 1);
    }

    #[tokio::test]
    async fn test_cart_rehydrates_from_storage() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStorage::new());
        let first = AppState::new(StorefrontConfig::default(), storage.clone());
        first.cart().await.add(ProductId::new(4), 3).unwrap();

        let second = AppState::new(StorefrontConfig::default(), storage);
        assert_eq!(second.cart().await.count(), 3);
    }

    #[test]
    fn test_open_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorefrontConfig {
            data_dir: dir.path().join("state"),
            ..StorefrontConfig::default()
        };

        let state = AppState::open(config).unwrap();
        assert!(dir.path().join("state").is_dir());
        assert_eq!(state.catalog().len(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_autosave_keeps_latest_form() {
        let state = AppState::in_memory();

        for name in ["A", "Ad", "Ada"] {
            state.autosave_draft(ContactForm {
                first_name: name.to_string(),
                ..ContactForm::default()
            });
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        assert_eq!(state.storage().get(keys::CONTACT_DRAFT).unwrap(), None);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        tokio::task::yield_now().await;
        assert_eq!(state.drafts().load().unwrap().form.first_name, "Ada");
    }

    fn recorder<T: Clone>() -> (Arc<StdMutex<Vec<T>>>, impl Fn() -> Vec<T>) {
        let seen: Arc<StdMutex<Vec<T>>> = Arc::default();
        let read = {
            let seen = seen.clone();
            move || seen.lock().unwrap().clone()
        };
        (seen, read)
    }

    fn search(term: &str) -> FilterSpec {
        FilterSpec {
            search: term.to_string(),
            ..FilterSpec::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_refresh_runs_once_for_latest_term() {
        let state = AppState::in_memory();
        let (seen, read) = recorder();

        for term in ["l", "lapt", "laptop"] {
            let seen = seen.clone();
            state.refresh_listing(ListingInput::Search, search(term), move |page| {
                let ids: Vec<u32> = page.items.iter().map(|p| p.id.as_u32()).collect();
                seen.lock().unwrap().push(ids);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(read().is_empty());

        tokio::time::sleep(Duration::from_millis(300)).await;
        tokio::task::yield_now().await;
        assert_eq!(read(), vec![vec![6, 1, 8]]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_price_refresh_waits_longer_than_search() {
        let state = AppState::in_memory();
        let (seen, read) = recorder();
        let filter = FilterSpec {
            max_price: Some(rust_decimal::Decimal::from(400)),
            ..FilterSpec::default()
        };

        let recorded = seen.clone();
        state.refresh_listing(ListingInput::Price, filter, move |page| {
            recorded.lock().unwrap().push(page.total_count);
        });

        tokio::time::sleep(Duration::from_millis(350)).await;
        tokio::task::yield_now().await;
        assert!(read().is_empty());

        tokio::time::sleep(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        assert_eq!(read(), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_and_price_debounce_independently() {
        let state = AppState::in_memory();
        let (seen, read) = recorder();

        for input in [ListingInput::Search, ListingInput::Price] {
            let seen = seen.clone();
            state.refresh_listing(input, FilterSpec::default(), move |page| {
                seen.lock().unwrap().push((input, page.total_count));
            });
        }

        tokio::time::sleep(Duration::from_millis(600)).await;
        tokio::task::yield_now().await;
        assert_eq!(
            read(),
            vec![(ListingInput::Search, 8), (ListingInput::Price, 8)]
        );
    }
}
