// Logging macros that pass the formatted message through a redactor

/// Format a message, redact it, and log it at debug level.
///
/// ```rust
/// use logger_redacted::{redacted_debug, PiiRedactor};
///
/// let redactor = PiiRedactor::default();
/// redacted_debug!(redactor, "saving patient with phone {}", "111-222-3333");
/// ```
#[macro_export]
macro_rules! redacted_debug {
    ($redactor:expr, $($arg:tt)*) => {
        tracing::debug!("{}", $redactor.redact(&format!($($arg)*)))
    };
}
