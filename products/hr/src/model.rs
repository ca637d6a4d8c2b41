/// Persisted shape of an employee.
///
/// `id` is `None` only for records that have not been saved yet; every record
/// handed back by a store carries the id it was assigned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub id: Option<i64>,
    pub full_name: String,
    pub email: String,
}

impl EmployeeRecord {
    pub fn new(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            full_name: full_name.into(),
            email: email.into(),
        }
    }
}
