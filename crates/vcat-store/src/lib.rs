//! # vcat-store
//!
//! Holds the committed vehicle catalog.
//!
//! - [`CatalogStore`]: full replace plus point and bulk reads
//! - [`MemoryCatalogStore`]: double-buffered process-local catalog
//! - [`LibsqlCatalogStore`]: persistent catalog in a local libSQL database
//! - [`CatalogBackend`]: whichever of the two the configuration selects
//! - [`CatalogService`]: read-only lookups for the query layer

pub mod error;
mod libsql_store;
mod memory;
pub mod service;

use std::future::Future;

use vcat_config::{StoreBackend, StoreConfig};
use vcat_core::Make;

pub use error::StoreError;
pub use libsql_store::LibsqlCatalogStore;
pub use memory::MemoryCatalogStore;
pub use service::CatalogService;

/// Persistence contract consumed by the ingestion pipelines.
///
/// Every method returns a `Send` future so pipelines holding a store can run
/// on spawned tasks.
pub trait CatalogStore: Send + Sync + 'static {
    /// Discard every entry and insert `makes` in order.
    fn replace_all(&self, makes: Vec<Make>) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// All entries in insertion order.
    fn find_all(&self) -> impl Future<Output = Result<Vec<Make>, StoreError>> + Send;

    /// First entry with `make_id`, or `None`.
    fn find_by_make_id(
        &self,
        make_id: &str,
    ) -> impl Future<Output = Result<Option<Make>, StoreError>> + Send;

    /// Replace the entry with the same `make_id`, or append it.
    fn upsert_one(&self, make: Make) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Store selected at runtime from [`StoreConfig`].
pub enum CatalogBackend {
    Memory(MemoryCatalogStore),
    Libsql(LibsqlCatalogStore),
}

impl CatalogBackend {
    /// Open the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the libSQL database cannot be opened.
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        match config.backend {
            StoreBackend::Memory => Ok(Self::Memory(MemoryCatalogStore::new())),
            StoreBackend::Libsql => Ok(Self::Libsql(
                LibsqlCatalogStore::open_file(&config.path).await?,
            )),
        }
    }

    #[must_use]
    pub const fn is_persistent(&self) -> bool {
        matches!(self, Self::Libsql(_))
    }
}

impl CatalogStore for CatalogBackend {
    async fn replace_all(&self, makes: Vec<Make>) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.replace_all(makes).await,
            Self::Libsql(store) => store.replace_all(makes).await,
        }
    }

    async fn find_all(&self) -> Result<Vec<Make>, StoreError> {
        match self {
            Self::Memory(store) => store.find_all().await,
            Self::Libsql(store) => store.find_all().await,
        }
    }

    async fn find_by_make_id(&self, make_id: &str) -> Result<Option<Make>, StoreError> {
        match self {
            Self::Memory(store) => store.find_by_make_id(make_id).await,
            Self::Libsql(store) => store.find_by_make_id(make_id).await,
        }
    }

    async fn upsert_one(&self, make: Make) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.upsert_one(make).await,
            Self::Libsql(store) => store.upsert_one(make).await,
        }
    }
}
