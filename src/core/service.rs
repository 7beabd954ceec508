//! Persistence traits
//!
//! The DTO layer never talks to a database directly. Handlers go through a
//! [`DataService`] per entity type, and the service is the authority on id
//! allocation and uniqueness.

use async_trait::async_trait;

use crate::core::error::DeskResult;

/// A persisted entity
pub trait Record: Clone + Send + Sync + 'static {
    /// Entity type name used in errors and logs (e.g. "invoice")
    const ENTITY: &'static str;

    fn id(&self) -> i64;

    /// Assigned by the store on insert
    fn set_id(&mut self, id: i64);

    /// `(field, value)` pairs that must be unique across all records of this type
    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Service trait for managing records of one type
///
/// Implementations provide CRUD operations for a specific entity type.
/// The DTO layer is agnostic to the underlying storage mechanism.
#[async_trait]
pub trait DataService<T: Record>: Send + Sync {
    /// Insert a new record, assigning its id
    ///
    /// Fails with `EntityError::Conflict` when a unique key is taken.
    async fn create(&self, record: T) -> DeskResult<T>;

    /// Get a record by ID
    async fn get(&self, id: i64) -> DeskResult<Option<T>>;

    /// List all records, ordered by id
    async fn list(&self) -> DeskResult<Vec<T>>;

    /// Replace an existing record
    ///
    /// Fails with `EntityError::NotFound` if the id is unknown and
    /// `EntityError::Conflict` if a unique key is taken by another record.
    async fn update(&self, id: i64, record: T) -> DeskResult<T>;

    /// Delete a record
    async fn delete(&self, id: i64) -> DeskResult<()>;
}
