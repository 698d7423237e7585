use lazy_static::lazy_static;
use regex::{Captures, Regex};
use sha2::{Digest, Sha256};

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
    static ref PHONE_REGEX: Regex =
        Regex::new(r"\b(?:\+1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}\b").unwrap();
    static ref SSN_REGEX: Regex = Regex::new(r"\b[0-9]{3}-[0-9]{2}-[0-9]{4}\b").unwrap();
}

/// PII redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub enabled: bool,
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_ssn: bool,
    /// Replace values with a short stable hash instead of a fixed mask, so
    /// log lines about the same value can still be correlated.
    pub hash_for_correlation: bool,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redact_emails: true,
            redact_phones: true,
            redact_ssn: true,
            hash_for_correlation: true,
        }
    }
}

impl RedactionConfig {
    /// Configuration that leaves text untouched.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// PII redactor for log messages
#[derive(Debug, Clone, Default)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn redact(&self, text: &str) -> String {
        if !self.config.enabled {
            return text.to_string();
        }

        let mut result = text.to_string();

        // SSNs first: the phone pattern is looser and must not see them.
        if self.config.redact_ssn {
            result = self.replace(&SSN_REGEX, &result, "SSN", |_| "***-**-****".to_string());
        }

        if self.config.redact_phones {
            result = self.replace(&PHONE_REGEX, &result, "PHONE", |_| "***-***-****".to_string());
        }

        if self.config.redact_emails {
            result = self.replace(&EMAIL_REGEX, &result, "EMAIL", mask_email);
        }

        result
    }

    fn replace(&self, pattern: &Regex, text: &str, label: &str, mask: fn(&str) -> String) -> String {
        pattern
            .replace_all(text, |caps: &Captures| {
                let value = caps.get(0).map_or("", |m| m.as_str());
                if self.config.hash_for_correlation {
                    format!("{}[{}]", label, hash_value(value))
                } else {
                    mask(value)
                }
            })
            .into_owned()
    }
}

fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = |s: &str| s.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}***", first(local), first(domain))
        }
        None => "***@***".to_string(),
    }
}

/// First eight bytes of the SHA-256 digest, hex encoded.
fn hash_value(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    hex::encode(digest.get(..8).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn masking() -> PiiRedactor {
        PiiRedactor::new(RedactionConfig {
            hash_for_correlation: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_email_redaction() {
        let redacted = masking().redact("Contact john.doe@example.com for records");
        assert!(redacted.contains("j***@e***"));
        assert!(!redacted.contains("john.doe"));
    }

    #[test]
    fn test_phone_redaction() {
        let redacted = masking().redact(r#"{"phone":"111-222-3333"}"#);
        assert_eq!(redacted, r#"{"phone":"***-***-****"}"#);
    }

    #[test]
    fn test_ssn_is_not_mistaken_for_phone() {
        let redacted = masking().redact("ssn 123-45-6789");
        assert_eq!(redacted, "ssn ***-**-****");
    }

    #[test]
    fn test_hash_is_stable_for_correlation() {
        let redactor = PiiRedactor::default();
        let first = redactor.redact("phone 111-222-3333");
        let second = redactor.redact("again 111-222-3333");

        assert!(first.starts_with("phone PHONE["));
        let tag = first.trim_start_matches("phone ");
        assert_eq!(second, format!("again {}", tag));
        assert!(!first.contains("111-222-3333"));
    }

    #[test]
    fn test_disabled_passes_text_through() {
        let redactor = PiiRedactor::new(RedactionConfig::disabled());
        let text = "phone 111-222-3333";
        assert_eq!(redactor.redact(text), text);
    }
}
