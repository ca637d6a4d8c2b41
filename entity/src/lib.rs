//! sea-orm entities backing the employee management service.

pub mod employees;
