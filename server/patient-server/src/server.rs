use std::sync::Arc;

use anyhow::{Context, Result};
use config_engine::{AppConfig, StorageBackend};
use database_layer::{MemoryStore, PatientStore, PgPatientStore};
use logger_redacted::PiiRedactor;
use tracing::{info, warn};

use crate::services::PatientService;
use crate::views::ViewRenderer;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct PatientServer {
    /// Loaded configuration
    pub config: Arc<AppConfig>,
    /// Patient flows over the configured store
    pub patients: Arc<PatientService>,
    /// Compiled page templates
    pub views: Arc<ViewRenderer>,
    /// Masks PII in payloads before they are logged
    pub redactor: PiiRedactor,
}

impl PatientServer {
    /// Connect the configured backend and build the server state.
    pub async fn new(config: AppConfig, redactor: PiiRedactor) -> Result<Self> {
        let store: Arc<dyn PatientStore> = match config.database.backend {
            StorageBackend::Postgres => {
                let store = PgPatientStore::connect(
                    &config.database.url,
                    config.database.max_connections,
                )
                .await
                .context("Failed to connect to the patient database")?;
                store
                    .ensure_schema()
                    .await
                    .context("Failed to prepare the patient table")?;
                info!("Using PostgreSQL patient store");
                Arc::new(store)
            }
            StorageBackend::Memory => {
                warn!("Using in-memory patient store; records are lost on restart");
                Arc::new(MemoryStore::patients())
            }
        };

        Self::with_store(config, store, redactor)
    }

    /// Build the server state over an existing store.
    /// This is useful for testing
    pub fn with_store(
        config: AppConfig,
        store: Arc<dyn PatientStore>,
        redactor: PiiRedactor,
    ) -> Result<Self> {
        let patients = PatientService::new(store, &config.peers);
        let views = ViewRenderer::new().context("Failed to compile page templates")?;

        Ok(Self {
            config: Arc::new(config),
            patients: Arc::new(patients),
            views: Arc::new(views),
            redactor,
        })
    }

    pub fn name(&self) -> &str {
        &self.config.server.name
    }
}
