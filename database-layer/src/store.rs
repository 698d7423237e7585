// Record store contracts
use async_trait::async_trait;

use crate::error::DatabaseResult;
use crate::models::{DomainElement, Patient};

/// Persistence contract for one record type.
///
/// `find_by_id` reports absence as `Ok(None)`; errors are reserved for the
/// datastore itself failing.
#[async_trait]
pub trait RecordStore<E: DomainElement>: Send + Sync {
    /// Insert a record without id, or replace every field of the row with the
    /// record's id. Returns the stored record carrying its id.
    async fn save(&self, record: E) -> DatabaseResult<E>;

    async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<E>>;

    /// All records ordered by id.
    async fn find_all(&self) -> DatabaseResult<Vec<E>>;

    async fn is_healthy(&self) -> bool {
        true
    }
}

/// Patient store with the two single-column projections peer services use.
///
/// Both projections are ordered by id so that position `i` of one matches
/// position `i` of the other.
#[async_trait]
pub trait PatientStore: RecordStore<Patient> {
    async fn all_ids(&self) -> DatabaseResult<Vec<i32>>;

    /// `"givenName familyName"` for every patient, in `all_ids` order.
    async fn all_display_names(&self) -> DatabaseResult<Vec<String>>;
}
