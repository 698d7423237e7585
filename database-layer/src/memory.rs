// In-process record store
use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{DatabaseError, DatabaseResult};
use crate::models::{DomainElement, Patient, PATIENT_TAG};
use crate::store::{PatientStore, RecordStore};

struct Table<E> {
    rows: BTreeMap<i32, E>,
    next_id: i32,
}

/// Record store held in process memory, keyed and ordered by id.
///
/// Ids start at 1 and are never reused.
pub struct MemoryStore<E> {
    entity: &'static str,
    table: RwLock<Table<E>>,
}

impl<E: DomainElement> MemoryStore<E> {
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.table.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MemoryStore<Patient> {
    pub fn patients() -> Self {
        Self::new(PATIENT_TAG)
    }
}

#[async_trait]
impl<E: DomainElement> RecordStore<E> for MemoryStore<E> {
    async fn save(&self, mut record: E) -> DatabaseResult<E> {
        let mut table = self.table.write();
        let id = match record.id() {
            Some(id) if table.rows.contains_key(&id) => id,
            Some(id) => {
                return Err(DatabaseError::NotFound {
                    entity: self.entity,
                    id,
                })
            }
            None => {
                let id = table.next_id;
                table.next_id = id.checked_add(1).ok_or_else(|| {
                    DatabaseError::QueryFailed(format!("{} id sequence exhausted", self.entity))
                })?;
                record.set_id(id);
                id
            }
        };
        table.rows.insert(id, record.clone());
        debug!(entity = self.entity, id, "Record saved in memory store");
        Ok(record)
    }

    async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<E>> {
        Ok(self.table.read().rows.get(&id).cloned())
    }

    async fn find_all(&self) -> DatabaseResult<Vec<E>> {
        Ok(self.table.read().rows.values().cloned().collect())
    }
}

#[async_trait]
impl PatientStore for MemoryStore<Patient> {
    async fn all_ids(&self) -> DatabaseResult<Vec<i32>> {
        Ok(self.table.read().rows.keys().copied().collect())
    }

    async fn all_display_names(&self) -> DatabaseResult<Vec<String>> {
        Ok(self
            .table
            .read()
            .rows
            .values()
            .map(Patient::display_name)
            .collect())
    }
}
