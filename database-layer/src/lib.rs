//! Record store for the patient registry
//!
//! This crate owns everything that touches persisted patient state:
//!
//! - [`Patient`], the demographic record, with its field constraints
//! - [`DomainElement`], the capability the generic CRUD layer relies on
//! - [`RecordStore`] / [`PatientStore`], the persistence contracts
//! - [`PgPatientStore`], the PostgreSQL implementation
//! - [`MemoryStore`], an in-process implementation for development and tests
//!
//! # Example
//!
//! ```rust,no_run
//! use database_layer::{PgPatientStore, PatientStore, RecordStore};
//!
//! # async fn run() -> database_layer::DatabaseResult<()> {
//! let store = PgPatientStore::connect("postgresql://localhost/patients", 5).await?;
//! store.ensure_schema().await?;
//!
//! for patient in store.find_all().await? {
//!     println!("{}", patient.display_name());
//! }
//! let ids = store.all_ids().await?;
//! # let _ = ids;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod memory;
pub mod models;
pub mod patient_repository;
pub mod store;

pub use error::*;
pub use memory::MemoryStore;
pub use models::*;
pub use patient_repository::PgPatientStore;
pub use store::*;
