// Sanity checks applied after loading
use crate::error::{ConfigError, Result};
use crate::settings::{AppConfig, StorageBackend};

pub fn validate(config: &AppConfig) -> Result<()> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port must be non-zero".to_string(),
        ));
    }

    if config.database.backend == StorageBackend::Postgres {
        if config.database.url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "database.url is required for the postgres backend".to_string(),
            ));
        }
        if config.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
    }

    Ok(())
}
