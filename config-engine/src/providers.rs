// Configuration sources: optional file, then environment
use std::path::Path;

use config::{Config, Environment, File};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::settings::AppConfig;
use crate::validation;

/// Prefix for environment overrides, e.g. `PATIENT_REGISTRY__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "PATIENT_REGISTRY";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from compiled defaults, an optional YAML/TOML/JSON file
/// and the environment, in increasing order of precedence.
///
/// A missing file is only an error when `require_file` is set.
pub fn load(path: Option<&Path>, require_file: bool) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        if require_file && !path.exists() {
            return Err(ConfigError::SourceNotFound(path.display().to_string()));
        }
        debug!(path = %path.display(), "Adding configuration file source");
        builder = builder.add_source(File::from(path).required(require_file));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;
    validation::validate(&app_config)?;

    Ok(app_config)
}
