use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::Arc;

use config_engine::PeerSettings;
use database_layer::{DatabaseResult, Patient, PatientStore, RecordStore, PATIENT_TAG};
use tracing::{debug, error};

use super::crud::{CrudService, EntityConfig};

pub type PatientCrud = CrudService<Patient, dyn PatientStore>;

/// Patient flows plus the lookups the assessment and history services call.
///
/// Every rendered page carries `urlAsmt` and `urlNote` so it can link to
/// the peer services.
pub struct PatientService {
    crud: PatientCrud,
}

impl PatientService {
    pub fn new(store: Arc<dyn PatientStore>, peers: &PeerSettings) -> Self {
        let crud = CrudService::new(store, EntityConfig::conventional(PATIENT_TAG))
            .with_context("urlAsmt", peers.assessment_url.clone())
            .with_context("urlNote", peers.history_url.clone());
        Self { crud }
    }

    pub async fn lookup_for_peer(&self, id: i32) -> DatabaseResult<Option<Patient>> {
        debug!(id, "Peer lookup");
        self.crud.store().find_by_id(id).await
    }

    /// Map of id to display name for every patient.
    ///
    /// Built from the two projections; if they disagree in length the
    /// index is unusable and `None` is returned rather than a partial map.
    pub async fn build_index(&self) -> DatabaseResult<Option<BTreeMap<i32, String>>> {
        let store = self.crud.store();
        let ids = store.all_ids().await?;
        let names = store.all_display_names().await?;

        if ids.len() != names.len() {
            error!(
                ids = ids.len(),
                names = names.len(),
                "Internal consistency fault: patient id and name projections differ in length"
            );
            return Ok(None);
        }

        Ok(Some(ids.into_iter().zip(names).collect()))
    }

    pub async fn is_healthy(&self) -> bool {
        self.crud.store().is_healthy().await
    }
}

impl Deref for PatientService {
    type Target = PatientCrud;

    fn deref(&self) -> &Self::Target {
        &self.crud
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::crud::View;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use database_layer::MemoryStore;
    use mockall::mock;

    mock! {
        Patients {}

        #[async_trait]
        impl RecordStore<Patient> for Patients {
            async fn save(&self, record: Patient) -> DatabaseResult<Patient>;
            async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<Patient>>;
            async fn find_all(&self) -> DatabaseResult<Vec<Patient>>;
            async fn is_healthy(&self) -> bool;
        }

        #[async_trait]
        impl PatientStore for Patients {
            async fn all_ids(&self) -> DatabaseResult<Vec<i32>>;
            async fn all_display_names(&self) -> DatabaseResult<Vec<String>>;
        }
    }

    fn patient(given: &str, family: &str) -> Patient {
        Patient {
            patient_id: None,
            family_name: family.into(),
            given_name: given.into(),
            dob: NaiveDate::from_ymd_opt(1952, 9, 27),
            sex: "F".into(),
            address: "12 Beechwood Road".into(),
            phone: "628-423-0993".into(),
        }
    }

    fn peers() -> PeerSettings {
        PeerSettings {
            assessment_url: "http://assessment:8080".into(),
            history_url: "http://history:8082".into(),
        }
    }

    #[tokio::test]
    async fn test_index_pairs_ids_with_names() {
        let store = Arc::new(MemoryStore::patients());
        let service = PatientService::new(store, &peers());

        service.create(patient("Tessa", "Carman")).await.unwrap();
        service.create(patient("Natalie", "Bailey")).await.unwrap();

        let index = service.build_index().await.unwrap().unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(&1).map(String::as_str), Some("Tessa Carman"));
        assert_eq!(index.get(&2).map(String::as_str), Some("Natalie Bailey"));
    }

    #[tokio::test]
    async fn test_index_of_empty_store_is_empty() {
        let service = PatientService::new(Arc::new(MemoryStore::patients()), &peers());
        assert_eq!(service.build_index().await.unwrap(), Some(BTreeMap::new()));
    }

    #[tokio::test]
    async fn test_mismatched_projections_yield_none() {
        let mut store = MockPatients::new();
        store.expect_all_ids().returning(|| Ok(vec![1, 2, 3]));
        store
            .expect_all_display_names()
            .returning(|| Ok(vec!["Tessa Carman".into(), "Natalie Bailey".into()]));

        let service = PatientService::new(Arc::new(store), &peers());
        assert_eq!(service.build_index().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_lookup_for_peer() {
        let service = PatientService::new(Arc::new(MemoryStore::patients()), &peers());
        let saved = service.create(patient("Tessa", "Carman")).await.unwrap();

        assert_eq!(service.lookup_for_peer(1).await.unwrap(), Some(saved));
        assert_eq!(service.lookup_for_peer(2).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_pages_carry_peer_urls() {
        let service = PatientService::new(Arc::new(MemoryStore::patients()), &peers());

        let View::Page { context, .. } = service.list_page().await.unwrap() else {
            unreachable!("list is always a page");
        };
        assert_eq!(context["urlAsmt"], "http://assessment:8080");
        assert_eq!(context["urlNote"], "http://history:8082");
        assert!(context["patients"].as_array().unwrap().is_empty());
    }
}
