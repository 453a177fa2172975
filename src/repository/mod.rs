//! Persistence boundary for observations.

pub mod sqlite;

pub use sqlite::SqliteObservationRepository;

use crate::error::Result;
use async_trait::async_trait;

/// Create, read, update and delete by identifier.
#[async_trait]
pub trait CrudRepository<T, Id>: Send + Sync
where
    T: Send + 'static,
    Id: Send + 'static,
{
    /// Insert `entity` and return it with its assigned identifier.
    async fn save(&self, entity: T) -> Result<T>;

    /// Replace the stored entity under `id`; fails when nothing is stored there.
    async fn update(&self, id: Id, entity: T) -> Result<T>;

    async fn find_by_id(&self, id: Id) -> Result<Option<T>>;

    async fn find_all(&self) -> Result<Vec<T>>;

    /// Returns whether a row was removed
    async fn delete_by_id(&self, id: Id) -> Result<bool>;

    /// Returns the number of rows removed
    async fn delete_all(&self) -> Result<u64>;

    /// Save each entity in turn. Not atomic.
    async fn save_all(&self, entities: Vec<T>) -> Result<Vec<T>> {
        let mut saved = Vec::with_capacity(entities.len());
        for entity in entities {
            saved.push(self.save(entity).await?);
        }
        Ok(saved)
    }
}
