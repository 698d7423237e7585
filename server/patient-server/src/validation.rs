//! Conversion of `validator` results into the field error maps used by API
//! error bodies and by re-rendered forms.
//!
//! Keys are the camelCase JSON field names (`familyName`, `dob`, ...), so a
//! client can match an error to the field it submitted.

use std::collections::HashMap;

use validator::ValidationErrors;

/// Flatten validation errors into `field -> messages`.
///
/// A constraint without a custom message is reported by its code.
pub fn field_errors(errors: &ValidationErrors) -> HashMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, failures)| {
            let messages = failures
                .iter()
                .map(|failure| match &failure.message {
                    Some(message) => message.to_string(),
                    None => failure.code.to_string(),
                })
                .collect();
            (camel_case(&field), messages)
        })
        .collect()
}

/// `family_name` -> `familyName`
pub fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use database_layer::Patient;
    use validator::Validate;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("family_name"), "familyName");
        assert_eq!(camel_case("dob"), "dob");
        assert_eq!(camel_case("patient_id"), "patientId");
    }

    #[test]
    fn test_field_errors_use_json_names_and_messages() {
        let patient = Patient {
            given_name: "Lucas".into(),
            family_name: "Ferguson".into(),
            dob: chrono::NaiveDate::from_ymd_opt(1968, 6, 22),
            sex: "M".into(),
            address: "2 Warren Street".into(),
            phone: "phone".into(),
            ..Patient::default()
        };

        let errors = patient.validate().unwrap_err();
        let fields = field_errors(&errors);

        assert_eq!(fields.len(), 1);
        assert_eq!(
            fields.get("phone").unwrap(),
            &vec!["Phone must match the format 000-000-0000".to_string()]
        );
    }
}
