//! Persistence seam for employee records.

mod database;
mod memory;

use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;

use crate::model::EmployeeRecord;

pub use database::DatabaseEmployeeStore;
pub use memory::InMemoryEmployeeStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Another record already holds this email.
    #[error("email {email} is already taken")]
    EmailTaken { email: String },
    /// An overwrite targeted an id that does not exist.
    #[error("no employee record with id {id}")]
    Missing { id: i64 },
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Keyed storage for employee records.
///
/// Implementations must be safe to share across request tasks. `save` is the
/// only write that can violate email uniqueness, so it must check and write
/// atomically.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// True iff a record with exactly this email exists.
    async fn exists_by_email(&self, email: &str) -> StoreResult<bool>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<EmployeeRecord>>;

    /// Insert when `record.id` is `None`, otherwise overwrite the record with
    /// that id. Returns the persisted record.
    ///
    /// Fails with [`StoreError::EmailTaken`] when a different record holds the
    /// email and with [`StoreError::Missing`] when overwriting an unknown id.
    async fn save(&self, record: EmployeeRecord) -> StoreResult<EmployeeRecord>;

    /// Remove the record if present. Absent ids are not an error.
    async fn delete_by_id(&self, id: i64) -> StoreResult<()>;

    /// Every record, ordered by ascending id.
    async fn find_all(&self) -> StoreResult<Vec<EmployeeRecord>>;

    /// Readiness probe used by the health endpoint.
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
