use serde::{Deserialize, Serialize};

/// Boundary representation of an employee, serialized as
/// `{ "id": 1, "fullName": "...", "email": "..." }`.
///
/// `id` is optional on input and ignored by create and update. `full_name`
/// and `email` are stored as given; empty strings are accepted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    #[serde(default)]
    pub id: Option<i64>,
    pub full_name: String,
    pub email: String,
}

impl EmployeeDto {
    pub fn new(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            full_name: full_name.into(),
            email: email.into(),
        }
    }
}
