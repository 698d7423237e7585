//! Configuration management for the patient registry
//!
//! Settings are layered, later sources overriding earlier ones:
//!
//! - **Defaults**: compiled into [`AppConfig`]
//! - **File**: YAML, TOML or JSON, picked by extension
//! - **Environment**: `PATIENT_REGISTRY__<SECTION>__<KEY>`
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! let config = config_engine::load(Some(Path::new("patient-registry.yaml")), false)?;
//! println!("listening on {}:{}", config.server.host, config.server.port);
//! # Ok::<(), config_engine::ConfigError>(())
//! ```
//!
//! ```yaml
//! server:
//!   port: 8081
//! database:
//!   backend: postgres
//!   url: postgresql://registry:registry@db:5432/registry
//! peers:
//!   assessment_url: http://assessment:8080
//!   history_url: http://history:8082
//! logging:
//!   level: debug
//!   json: true
//! ```

pub mod error;
pub mod providers;
pub mod settings;
pub mod validation;

pub use error::*;
pub use providers::{load, ENV_PREFIX};
pub use settings::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn yaml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_file() {
        let config = load(None, false).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.database.backend, StorageBackend::Postgres);
        assert!(config.logging.redact_pii);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = yaml_file(
            "server:\n  port: 9100\ndatabase:\n  backend: memory\npeers:\n  history_url: http://history:8082\n",
        );

        let config = load(Some(file.path()), true).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.backend, StorageBackend::Memory);
        assert_eq!(config.peers.history_url, "http://history:8082");
        assert_eq!(config.peers.assessment_url, PeerSettings::default().assessment_url);
    }

    #[test]
    fn test_missing_required_file() {
        let result = load(Some(std::path::Path::new("/nonexistent/registry.yaml")), true);
        assert!(matches!(result, Err(ConfigError::SourceNotFound(_))));
    }

    #[test]
    fn test_missing_optional_file_falls_back() {
        let config = load(Some(std::path::Path::new("/nonexistent/registry.yaml")), false).unwrap();
        assert_eq!(config, load(None, false).unwrap());
    }

    #[test]
    fn test_zero_port_rejected() {
        let file = yaml_file("server:\n  port: 0\n");
        let result = load(Some(file.path()), true);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_postgres_requires_url() {
        let mut config = AppConfig::default();
        config.database.url = "  ".to_string();
        assert!(validation::validate(&config).is_err());

        config.database.backend = StorageBackend::Memory;
        assert!(validation::validate(&config).is_ok());
    }
}
