use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::{debug, info};

use crate::connection;
use crate::error::{DatabaseError, DatabaseResult};
use crate::models::{Patient, PATIENT_TAG};
use crate::store::{PatientStore, RecordStore};

const PATIENT_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS patient (
    patient_id  SERIAL PRIMARY KEY,
    family_name TEXT NOT NULL,
    given_name  TEXT NOT NULL,
    dob         DATE,
    sex         TEXT NOT NULL,
    address     TEXT NOT NULL,
    phone       TEXT NOT NULL
)
"#;

/// Repository for patient rows in PostgreSQL
#[derive(Debug, Clone)]
pub struct PgPatientStore {
    pool: Pool<Postgres>,
}

impl PgPatientStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Connect a fresh pool and wrap it.
    pub async fn connect(connection_string: &str, max_connections: u32) -> DatabaseResult<Self> {
        let pool = connection::connect_pool(connection_string, max_connections).await?;
        Ok(Self::new(pool))
    }

    /// Create the patient table when it does not exist yet.
    pub async fn ensure_schema(&self) -> DatabaseResult<()> {
        sqlx::query(PATIENT_SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryFailed(format!("Failed to create patient table: {}", e)))?;

        info!("Patient table ready");
        Ok(())
    }

    async fn insert(&self, patient: &Patient) -> DatabaseResult<Patient> {
        let saved = sqlx::query_as::<_, Patient>(
            r#"
            INSERT INTO patient (family_name, given_name, dob, sex, address, phone)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING patient_id, family_name, given_name, dob, sex, address, phone
            "#,
        )
        .bind(&patient.family_name)
        .bind(&patient.given_name)
        .bind(patient.dob)
        .bind(&patient.sex)
        .bind(&patient.address)
        .bind(&patient.phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn replace(&self, id: i32, patient: &Patient) -> DatabaseResult<Patient> {
        sqlx::query_as::<_, Patient>(
            r#"
            UPDATE patient SET
                family_name = $2,
                given_name = $3,
                dob = $4,
                sex = $5,
                address = $6,
                phone = $7
            WHERE patient_id = $1
            RETURNING patient_id, family_name, given_name, dob, sex, address, phone
            "#,
        )
        .bind(id)
        .bind(&patient.family_name)
        .bind(&patient.given_name)
        .bind(patient.dob)
        .bind(&patient.sex)
        .bind(&patient.address)
        .bind(&patient.phone)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DatabaseError::NotFound {
            entity: PATIENT_TAG,
            id,
        })
    }
}

#[async_trait]
impl RecordStore<Patient> for PgPatientStore {
    async fn save(&self, record: Patient) -> DatabaseResult<Patient> {
        let saved = match record.patient_id {
            Some(id) => self.replace(id, &record).await?,
            None => self.insert(&record).await?,
        };
        debug!(patient_id = ?saved.patient_id, "Patient row saved");
        Ok(saved)
    }

    async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<Patient>> {
        let patient = sqlx::query_as::<_, Patient>(
            r#"
            SELECT patient_id, family_name, given_name, dob, sex, address, phone
            FROM patient
            WHERE patient_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(patient)
    }

    async fn find_all(&self) -> DatabaseResult<Vec<Patient>> {
        let patients = sqlx::query_as::<_, Patient>(
            r#"
            SELECT patient_id, family_name, given_name, dob, sex, address, phone
            FROM patient
            ORDER BY patient_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(patients)
    }

    async fn is_healthy(&self) -> bool {
        connection::is_healthy(&self.pool).await
    }
}

#[async_trait]
impl PatientStore for PgPatientStore {
    async fn all_ids(&self) -> DatabaseResult<Vec<i32>> {
        let ids = sqlx::query_scalar::<_, i32>("SELECT patient_id FROM patient ORDER BY patient_id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(ids)
    }

    async fn all_display_names(&self) -> DatabaseResult<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT given_name || ' ' || family_name FROM patient ORDER BY patient_id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }
}
