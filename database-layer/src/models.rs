// Database models
use std::fmt;

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

lazy_static! {
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^[0-9]{3}-[0-9]{3}-[0-9]{4}$").unwrap();
    pub static ref SEX_REGEX: Regex = Regex::new(r"^(?i:[MF])$").unwrap();
    /// At least one non-whitespace character.
    pub static ref NOT_BLANK_REGEX: Regex = Regex::new(r"\S").unwrap();
}

/// Type tag used for patient routes, templates and the canonical JSON wrapper.
pub const PATIENT_TAG: &str = "patient";

/// Capability every record managed by the generic CRUD layer must provide.
///
/// A domain element carries an integer id that the store assigns on first
/// save, knows its own field constraints through [`Validate`], and renders to
/// a canonical JSON document wrapped in its type tag.
pub trait DomainElement:
    Clone + fmt::Debug + Default + Serialize + Validate + Send + Sync + 'static
{
    /// Store-assigned id, `None` until the record has been saved once.
    fn id(&self) -> Option<i32>;

    fn set_id(&mut self, id: i32);

    /// Forget the id so the next save inserts a new row.
    fn clear_id(&mut self);

    /// Canonical rendering: `{"<type_tag>": { ...fields }}`.
    fn render(&self, type_tag: &str) -> Value {
        let mut wrapper = serde_json::Map::new();
        wrapper.insert(
            type_tag.to_owned(),
            serde_json::to_value(self).unwrap_or_default(),
        );
        Value::Object(wrapper)
    }
}

/// Patient demographics, the sole record type of the registry.
///
/// Every field defaults when absent from a payload so that incomplete
/// submissions reach validation instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, sqlx::FromRow)]
#[serde(rename_all = "camelCase", default)]
pub struct Patient {
    pub patient_id: Option<i32>,

    #[validate(regex(path = *NOT_BLANK_REGEX, message = "Family name is required"))]
    pub family_name: String,

    #[validate(regex(path = *NOT_BLANK_REGEX, message = "Given name is required"))]
    pub given_name: String,

    #[validate(required(message = "Date of birth is required"))]
    pub dob: Option<NaiveDate>,

    #[validate(regex(path = *SEX_REGEX, message = "Sex must be M or F"))]
    pub sex: String,

    #[validate(regex(path = *NOT_BLANK_REGEX, message = "Address is required"))]
    pub address: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Phone must match the format 000-000-0000"))]
    pub phone: String,
}

impl Patient {
    /// Name shown in listings and in the peer-service index.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

impl DomainElement for Patient {
    fn id(&self) -> Option<i32> {
        self.patient_id
    }

    fn set_id(&mut self, id: i32) {
        self.patient_id = Some(id);
    }

    fn clear_id(&mut self) {
        self.patient_id = None;
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(PATIENT_TAG))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn valid_patient() -> Patient {
        Patient {
            patient_id: None,
            family_name: "Ferguson".into(),
            given_name: "Lucas".into(),
            dob: NaiveDate::from_ymd_opt(1968, 6, 22),
            sex: "M".into(),
            address: "2 Warren Street".into(),
            phone: "387-866-1399".into(),
        }
    }

    #[test]
    fn test_valid_patient_passes() {
        assert!(valid_patient().validate().is_ok());
    }

    #[test]
    fn test_sex_is_case_insensitive() {
        let mut patient = valid_patient();
        patient.sex = "f".into();
        assert!(patient.validate().is_ok());

        patient.sex = "abcd".into();
        let errors = patient.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("sex"));
    }

    #[test]
    fn test_blank_fields_are_reported_together() {
        let patient = Patient {
            patient_id: Some(1),
            phone: "1112223333".into(),
            ..Patient::default()
        };

        let errors = patient.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["family_name", "given_name", "dob", "sex", "address", "phone"] {
            assert!(fields.contains_key(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_whitespace_only_text_is_blank() {
        let patient = Patient {
            family_name: "   ".into(),
            given_name: "\t".into(),
            address: " ".into(),
            ..valid_patient()
        };

        let errors = patient.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["family_name", "given_name", "address"] {
            assert!(fields.contains_key(field), "missing error for {field}");
        }
        assert!(!fields.contains_key("phone"));
    }

    #[test]
    fn test_deserializes_partial_payload() {
        let patient: Patient =
            serde_json::from_str(r#"{"patientId": 3, "phone": "111-222-3333"}"#).unwrap();
        assert_eq!(patient.patient_id, Some(3));
        assert_eq!(patient.phone, "111-222-3333");
        assert!(patient.family_name.is_empty());
        assert!(patient.dob.is_none());
    }

    #[test]
    fn test_render_wraps_in_type_tag() {
        let mut patient = valid_patient();
        patient.set_id(7);

        let rendered = patient.render(PATIENT_TAG);
        assert_eq!(rendered["patient"]["patientId"], 7);
        assert_eq!(rendered["patient"]["familyName"], "Ferguson");
        assert_eq!(rendered["patient"]["dob"], "1968-06-22");
        assert_eq!(patient.to_string(), rendered.to_string());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(valid_patient().display_name(), "Lucas Ferguson");
    }

    proptest! {
        #[test]
        fn prop_formatted_phone_numbers_validate(phone in "[0-9]{3}-[0-9]{3}-[0-9]{4}") {
            let mut patient = valid_patient();
            patient.phone = phone;
            prop_assert!(patient.validate().is_ok());
        }

        #[test]
        fn prop_undelimited_phone_numbers_fail(phone in "[0-9]{10}") {
            let mut patient = valid_patient();
            patient.phone = phone;
            prop_assert!(patient.validate().is_err());
        }

        #[test]
        fn prop_other_sex_codes_fail(sex in "[A-EG-LN-Za-eg-ln-z0-9]{1,3}") {
            let mut patient = valid_patient();
            patient.sex = sex;
            prop_assert!(patient.validate().is_err());
        }
    }
}
