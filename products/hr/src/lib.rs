//! HR vertical slice.
//!
//! [`EmployeeService`] owns the employee use cases and their invariants. It
//! talks to persistence only through the [`EmployeeStore`] trait, so the same
//! service runs against [`DatabaseEmployeeStore`] in production and
//! [`InMemoryEmployeeStore`] in tests and `--in-memory` mode.

pub mod dto;
pub mod error;
pub mod mapper;
pub mod model;
pub mod service;
pub mod store;

pub use dto::EmployeeDto;
pub use error::{HrError, HrResult};
pub use model::EmployeeRecord;
pub use service::EmployeeService;
pub use store::{
    DatabaseEmployeeStore, EmployeeStore, InMemoryEmployeeStore, StoreError, StoreResult,
};
