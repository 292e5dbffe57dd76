//! Process-local catalog store.

use std::sync::{Arc, RwLock};

use vcat_core::Make;

use crate::CatalogStore;
use crate::error::StoreError;

/// Double-buffered in-memory catalog.
///
/// Readers clone the current snapshot; [`replace_all`](CatalogStore::replace_all)
/// builds the next one and swaps it in under the write lock, so a reader sees
/// either the previous catalog or the new one, never an empty gap.
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    catalog: RwLock<Arc<Vec<Make>>>,
}

impl MemoryCatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `makes`.
    #[must_use]
    pub fn with_makes(makes: Vec<Make>) -> Self {
        Self {
            catalog: RwLock::new(Arc::new(makes)),
        }
    }

    fn snapshot(&self) -> Result<Arc<Vec<Make>>, StoreError> {
        self.catalog
            .read()
            .map(|catalog| Arc::clone(&catalog))
            .map_err(|_| StoreError::Poisoned)
    }
}

impl CatalogStore for MemoryCatalogStore {
    async fn replace_all(&self, makes: Vec<Make>) -> Result<(), StoreError> {
        let count = makes.len();
        let next = Arc::new(makes);
        *self.catalog.write().map_err(|_| StoreError::Poisoned)? = next;
        tracing::info!(count, "catalog replaced");
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Make>, StoreError> {
        let catalog = self.snapshot()?;
        tracing::debug!(count = catalog.len(), "fetched all makes");
        Ok(catalog.as_ref().clone())
    }

    async fn find_by_make_id(&self, make_id: &str) -> Result<Option<Make>, StoreError> {
        let catalog = self.snapshot()?;
        let found = catalog.iter().find(|m| m.make_id == make_id).cloned();
        if found.is_none() {
            tracing::debug!(make_id, "make not found");
        }
        Ok(found)
    }

    async fn upsert_one(&self, make: Make) -> Result<(), StoreError> {
        let mut catalog = self.catalog.write().map_err(|_| StoreError::Poisoned)?;
        let entries = Arc::make_mut(&mut catalog);
        match entries.iter_mut().find(|m| m.make_id == make.make_id) {
            Some(existing) => *existing = make,
            None => entries.push(make),
        }
        Ok(())
    }
}
