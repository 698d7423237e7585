pub mod crud;
pub mod patient;

pub use crud::{CrudService, EntityConfig, ServiceError, View};
pub use patient::PatientService;
