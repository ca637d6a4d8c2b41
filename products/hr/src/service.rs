use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    dto::EmployeeDto,
    error::{HrError, HrResult},
    mapper,
    store::{EmployeeStore, StoreError},
};

/// Employee use cases.
///
/// Stateless between calls; cloning shares the underlying store. Every
/// operation does at most one read and one write against the store.
#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    /// Create a new employee. Any `id` on the input is ignored. Field contents
    /// are not validated; only email uniqueness is enforced.
    ///
    /// The existence check gives the common case a cheap early exit; the
    /// store's constrained save catches concurrent creates that both pass it.
    #[instrument(name = "hr.employees.create", skip_all)]
    pub async fn create_employee(&self, dto: EmployeeDto) -> HrResult<EmployeeDto> {
        if self.store.exists_by_email(&dto.email).await? {
            warn!(email = %dto.email, "employee email already registered");
            return Err(HrError::DuplicateEntry(dto.email));
        }
        let record = mapper::to_record(EmployeeDto { id: None, ..dto });
        let saved = self.store.save(record).await.inspect_err(log_conflict)?;
        info!(id = ?saved.id, "employee created");
        Ok(mapper::to_dto(saved))
    }

    #[instrument(name = "hr.employees.get", skip(self))]
    pub async fn get_an_employee(&self, id: i64) -> HrResult<EmployeeDto> {
        let record = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(HrError::ResourceNotFound(id))?;
        Ok(mapper::to_dto(record))
    }

    /// Overwrite `full_name` and `email` of an existing employee. The id is
    /// taken from the lookup, never from `dto`. Moving onto an email held by a
    /// different employee fails with [`HrError::DuplicateEntry`].
    #[instrument(name = "hr.employees.update", skip(self, dto))]
    pub async fn update_an_employee(&self, id: i64, dto: EmployeeDto) -> HrResult<EmployeeDto> {
        let mut record = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(HrError::ResourceNotFound(id))?;
        record.full_name = dto.full_name;
        record.email = dto.email;
        let updated = self.store.save(record).await.inspect_err(log_conflict)?;
        info!("employee updated");
        Ok(mapper::to_dto(updated))
    }

    /// Delete by id. Deleting an id that does not exist succeeds.
    #[instrument(name = "hr.employees.delete", skip(self))]
    pub async fn delete_an_employee_by_id(&self, id: i64) -> HrResult<()> {
        self.store.delete_by_id(id).await?;
        info!("employee deleted");
        Ok(())
    }

    #[instrument(name = "hr.employees.list", skip_all)]
    pub async fn get_all_employees(&self) -> HrResult<Vec<EmployeeDto>> {
        let records = self.store.find_all().await?;
        Ok(records.into_iter().map(mapper::to_dto).collect())
    }

    /// True when the backing store answers.
    pub async fn ready(&self) -> bool {
        self.store.ping().await.is_ok()
    }
}

fn log_conflict(err: &StoreError) {
    if let StoreError::EmailTaken { email } = err {
        warn!(%email, "store rejected duplicate employee email");
    }
}
