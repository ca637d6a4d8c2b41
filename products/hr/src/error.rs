use thiserror::Error;

use crate::store::StoreError;

pub type HrResult<T> = Result<T, HrError>;

/// Failures surfaced by [`crate::EmployeeService`].
#[derive(Debug, Error)]
pub enum HrError {
    #[error("No Employee found with given id: {0}")]
    ResourceNotFound(i64),
    #[error("{0} is already exists!")]
    DuplicateEntry(String),
    #[error(transparent)]
    InternalFailure(#[from] anyhow::Error),
}

impl From<StoreError> for HrError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmailTaken { email } => HrError::DuplicateEntry(email),
            StoreError::Missing { id } => HrError::ResourceNotFound(id),
            StoreError::Database(source) => HrError::InternalFailure(source.into()),
        }
    }
}
