// Logger configuration
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub log_level: String,
    pub json: bool,
    pub redaction_enabled: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            redaction_enabled: true,
        }
    }
}

impl LoggerConfig {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn with_redaction(mut self, enabled: bool) -> Self {
        self.redaction_enabled = enabled;
        self
    }
}
