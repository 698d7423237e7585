// HTML form payloads
use chrono::NaiveDate;
use database_layer::Patient;
use serde::Deserialize;

/// Fields posted by the add and update forms.
///
/// Everything arrives as text so that a bad date still reaches validation
/// instead of failing extraction; an empty or unparseable `dob` becomes an
/// absent date and is reported by the `dob` constraint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientForm {
    pub family_name: String,
    pub given_name: String,
    pub dob: String,
    pub sex: String,
    pub address: String,
    pub phone: String,
}

impl PatientForm {
    pub fn into_candidate(self) -> Patient {
        Patient {
            patient_id: None,
            family_name: self.family_name.trim().to_string(),
            given_name: self.given_name.trim().to_string(),
            dob: NaiveDate::parse_from_str(self.dob.trim(), "%Y-%m-%d").ok(),
            sex: self.sex.trim().to_string(),
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_to_candidate() {
        let form = PatientForm {
            family_name: " Carman ".into(),
            given_name: "Tessa".into(),
            dob: "1952-09-27".into(),
            sex: "F".into(),
            address: "1 Brookside St".into(),
            phone: "100-222-3333".into(),
        };

        let patient = form.into_candidate();
        assert_eq!(patient.family_name, "Carman");
        assert_eq!(patient.dob, NaiveDate::from_ymd_opt(1952, 9, 27));
        assert!(patient.patient_id.is_none());
    }

    #[test]
    fn test_unparseable_date_is_absent() {
        let form = PatientForm {
            dob: "27/09/1952".into(),
            ..PatientForm::default()
        };
        assert!(form.into_candidate().dob.is_none());
    }
}
