//! Read-only catalog lookups for the query layer.
//!
//! A missing make is `Ok(None)`, kept apart from store failures.

use std::sync::Arc;

use vcat_core::Make;

use crate::CatalogStore;
use crate::error::StoreError;

pub struct CatalogService<S> {
    store: Arc<S>,
}

impl<S> Clone for CatalogService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: CatalogStore> CatalogService<S> {
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Every make in the committed catalog.
    ///
    /// # Errors
    ///
    /// Propagates the store's read error.
    pub async fn get_all_makes(&self) -> Result<Vec<Make>, StoreError> {
        tracing::info!("fetching all vehicle makes");
        let makes = self.store.find_all().await?;
        tracing::info!(count = makes.len(), "fetched vehicle makes");
        Ok(makes)
    }

    /// The make with `make_id`, or `None` when the catalog has no such make.
    ///
    /// # Errors
    ///
    /// Propagates the store's read error.
    pub async fn get_make_by_id(&self, make_id: &str) -> Result<Option<Make>, StoreError> {
        tracing::info!(make_id, "fetching vehicle make");
        let make = self.store.find_by_make_id(make_id).await?;
        if make.is_none() {
            tracing::warn!(make_id, "vehicle make not found");
        }
        Ok(make)
    }
}
