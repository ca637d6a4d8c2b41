use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{EmployeeStore, StoreError, StoreResult};
use crate::model::EmployeeRecord;

#[derive(Debug)]
struct State {
    next_id: i64,
    records: BTreeMap<i64, EmployeeRecord>,
}

/// Process-local store. Ids start at 1 and are never reused, even after a
/// delete.
#[derive(Debug)]
pub struct InMemoryEmployeeStore {
    state: RwLock<State>,
}

impl Default for InMemoryEmployeeStore {
    fn default() -> Self {
        Self {
            state: RwLock::new(State {
                next_id: 1,
                records: BTreeMap::new(),
            }),
        }
    }
}

impl InMemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl EmployeeStore for InMemoryEmployeeStore {
    async fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        let state = self.state.read().await;
        Ok(state.records.values().any(|record| record.email == email))
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<EmployeeRecord>> {
        Ok(self.state.read().await.records.get(&id).cloned())
    }

    async fn save(&self, mut record: EmployeeRecord) -> StoreResult<EmployeeRecord> {
        let mut state = self.state.write().await;
        let taken = state
            .records
            .values()
            .any(|other| other.email == record.email && other.id != record.id);
        if taken {
            return Err(StoreError::EmailTaken {
                email: record.email,
            });
        }
        let id = match record.id {
            Some(id) if state.records.contains_key(&id) => id,
            Some(id) => return Err(StoreError::Missing { id }),
            None => {
                let id = state.next_id;
                state.next_id += 1;
                id
            }
        };
        record.id = Some(id);
        state.records.insert(id, record.clone());
        Ok(record)
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<()> {
        self.state.write().await.records.remove(&id);
        Ok(())
    }

    async fn find_all(&self) -> StoreResult<Vec<EmployeeRecord>> {
        Ok(self.state.read().await.records.values().cloned().collect())
    }
}
