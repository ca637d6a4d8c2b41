use async_trait::async_trait;
use entity::employees;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, SqlErr,
};
use tracing::debug;

use super::{EmployeeStore, StoreError, StoreResult};
use crate::model::EmployeeRecord;

/// sea-orm backed store over the `employees` table.
///
/// Email uniqueness is enforced by the table's `UNIQUE` constraint, so
/// concurrent saves racing for one email cannot both succeed.
#[derive(Clone, Debug)]
pub struct DatabaseEmployeeStore {
    db: DatabaseConnection,
}

impl DatabaseEmployeeStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<employees::Model> for EmployeeRecord {
    fn from(model: employees::Model) -> Self {
        Self {
            id: Some(model.id),
            full_name: model.full_name,
            email: model.email,
        }
    }
}

fn active_model(record: &EmployeeRecord) -> employees::ActiveModel {
    employees::ActiveModel {
        id: match record.id {
            Some(id) => ActiveValue::Unchanged(id),
            None => ActiveValue::NotSet,
        },
        full_name: ActiveValue::Set(record.full_name.clone()),
        email: ActiveValue::Set(record.email.clone()),
    }
}

fn classify(err: DbErr, record: &EmployeeRecord) -> StoreError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        debug!(%detail, "unique constraint rejected employee save");
        return StoreError::EmailTaken {
            email: record.email.clone(),
        };
    }
    match (err, record.id) {
        (DbErr::RecordNotUpdated, Some(id)) => StoreError::Missing { id },
        (err, _) => StoreError::Database(err),
    }
}

#[async_trait]
impl EmployeeStore for DatabaseEmployeeStore {
    async fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        let count = employees::Entity::find()
            .filter(employees::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<EmployeeRecord>> {
        let model = employees::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn save(&self, record: EmployeeRecord) -> StoreResult<EmployeeRecord> {
        let model = active_model(&record);
        let saved = match record.id {
            None => model.insert(&self.db).await,
            Some(_) => model.update(&self.db).await,
        };
        saved
            .map(Into::into)
            .map_err(|err| classify(err, &record))
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<()> {
        let result = employees::Entity::delete_by_id(id).exec(&self.db).await?;
        debug!(id, rows = result.rows_affected, "employee delete executed");
        Ok(())
    }

    async fn find_all(&self) -> StoreResult<Vec<EmployeeRecord>> {
        let models = employees::Entity::find()
            .order_by_asc(employees::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.db.ping().await?;
        Ok(())
    }
}
