//! libSQL-backed catalog store.
//!
//! One connection guarded by an async mutex. Full replaces run inside a
//! transaction, so a concurrent reader waits for the commit instead of seeing
//! the catalog between the delete and the inserts.

use std::path::Path;

use libsql::Builder;
use tokio::sync::Mutex;
use vcat_core::{Make, VehicleType};

use crate::CatalogStore;
use crate::error::StoreError;

const MIGRATION_001: &str = include_str!("../migrations/001_catalog.sql");

pub struct LibsqlCatalogStore {
    _db: libsql::Database,
    conn: Mutex<libsql::Connection>,
}

impl LibsqlCatalogStore {
    /// Open a local database at `path` (`":memory:"` for a throwaway one) and
    /// run migrations.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database cannot be opened or migrations
    /// fail.
    pub async fn open_local(path: &str) -> Result<Self, StoreError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        conn.execute_batch(MIGRATION_001)
            .await
            .map_err(|e| StoreError::Migration(format!("001_catalog: {e}")))?;
        tracing::debug!(path, "catalog database opened");
        Ok(Self {
            _db: db,
            conn: Mutex::new(conn),
        })
    }

    /// Open a database file, creating its parent directory first.
    ///
    /// # Errors
    ///
    /// Same as [`Self::open_local`], plus [`StoreError::Write`] if the parent
    /// directory cannot be created.
    pub async fn open_file(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Write(format!("{}: {e}", parent.display())))?;
        }
        Self::open_local(&path.to_string_lossy()).await
    }
}

fn row_to_make(row: &libsql::Row) -> Result<Make, StoreError> {
    let vehicle_types: Vec<VehicleType> = serde_json::from_str(&row.get::<String>(2)?)?;
    Ok(Make {
        make_id: row.get::<String>(0)?,
        make_name: row.get::<String>(1)?,
        vehicle_types,
    })
}

fn write_error(error: libsql::Error) -> StoreError {
    StoreError::Write(error.to_string())
}

impl CatalogStore for LibsqlCatalogStore {
    async fn replace_all(&self, makes: Vec<Make>) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let tx = conn.transaction().await.map_err(write_error)?;

        tx.execute("DELETE FROM makes", ())
            .await
            .map_err(write_error)?;

        let mut position: i64 = 0;
        for make in &makes {
            let vehicle_types = serde_json::to_string(&make.vehicle_types)?;
            tx.execute(
                "INSERT INTO makes (position, make_id, make_name, vehicle_types) VALUES (?1, ?2, ?3, ?4)",
                libsql::params![
                    position,
                    make.make_id.as_str(),
                    make.make_name.as_str(),
                    vehicle_types
                ],
            )
            .await
            .map_err(write_error)?;
            position += 1;
        }

        tx.commit().await.map_err(write_error)?;
        tracing::info!(count = makes.len(), "catalog replaced");
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Make>, StoreError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query(
                "SELECT make_id, make_name, vehicle_types FROM makes ORDER BY position",
                (),
            )
            .await?;
        let mut makes = Vec::new();
        while let Some(row) = rows.next().await? {
            makes.push(row_to_make(&row)?);
        }
        tracing::debug!(count = makes.len(), "fetched all makes");
        Ok(makes)
    }

    async fn find_by_make_id(&self, make_id: &str) -> Result<Option<Make>, StoreError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query(
                "SELECT make_id, make_name, vehicle_types FROM makes
                 WHERE make_id = ?1 ORDER BY position LIMIT 1",
                [make_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_make(&row)?)),
            None => {
                tracing::debug!(make_id, "make not found");
                Ok(None)
            }
        }
    }

    async fn upsert_one(&self, make: Make) -> Result<(), StoreError> {
        let vehicle_types = serde_json::to_string(&make.vehicle_types)?;
        let conn = self.conn.lock().await;
        let tx = conn.transaction().await.map_err(write_error)?;

        let updated = tx
            .execute(
                "UPDATE makes SET make_name = ?2, vehicle_types = ?3
                 WHERE position = (SELECT MIN(position) FROM makes WHERE make_id = ?1)",
                libsql::params![
                    make.make_id.as_str(),
                    make.make_name.as_str(),
                    vehicle_types.as_str()
                ],
            )
            .await
            .map_err(write_error)?;

        if updated == 0 {
            tx.execute(
                "INSERT INTO makes (position, make_id, make_name, vehicle_types)
                 VALUES ((SELECT COALESCE(MAX(position), -1) + 1 FROM makes), ?1, ?2, ?3)",
                libsql::params![
                    make.make_id.as_str(),
                    make.make_name.as_str(),
                    vehicle_types.as_str()
                ],
            )
            .await
            .map_err(write_error)?;
        }

        tx.commit().await.map_err(write_error)?;
        tracing::debug!(make_id = %make.make_id, inserted = updated == 0, "make upserted");
        Ok(())
    }
}
