//! Logging for the patient registry
//!
//! Installs a `tracing` subscriber (human-readable or JSON lines) and hands
//! out a [`PiiRedactor`] that masks phone numbers, email addresses and SSNs
//! in text that reaches the log.
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init, redacted_debug, LoggerConfig};
//!
//! let redactor = init(&LoggerConfig::default().with_json(true))?;
//! redacted_debug!(redactor, "payload {}", r#"{"phone":"111-222-3333"}"#);
//! // payload {"phone":"PHONE[<16 hex chars>]"}
//! # Ok::<(), logger_redacted::LoggerError>(())
//! ```

pub mod config;
pub mod macros;
pub mod redactor;
pub mod subscriber;

pub use config::*;
pub use redactor::*;
pub use subscriber::*;
