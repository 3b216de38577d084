//! Pure form validation. No side effects, cheap enough to run on every
//! keystroke, which is how the UI calls it.

use std::collections::BTreeMap;

use super::model::{EnquiryFields, EnquiryKind};

/// Field name -> user-facing error message. Empty map means the form passes.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

/// Checks required-field presence (after trimming) and the email shape.
/// The required set depends on the enquiry kind.
pub fn validate(kind: EnquiryKind, fields: &EnquiryFields) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if fields.name.trim().is_empty() {
        errors.insert("name", "Name is required");
    }
    if fields.email.trim().is_empty() {
        errors.insert("email", "Email is required");
    } else if !plausible_email(fields.email.trim()) {
        errors.insert("email", "Email is invalid");
    }
    if fields.phone.trim().is_empty() {
        errors.insert("phone", "Phone is required");
    }

    match kind {
        EnquiryKind::Distributor => {
            if fields.company.trim().is_empty() {
                errors.insert("company", "Company is required");
            }
            if fields.location.trim().is_empty() {
                errors.insert("location", "Location is required");
            }
            if fields.experience.trim().is_empty() {
                errors.insert("experience", "Experience is required");
            }
        }
        EnquiryKind::Course => {
            if fields.profession.trim().is_empty() {
                errors.insert("profession", "Profession is required");
            }
            if fields.clinic_name.trim().is_empty() {
                errors.insert("clinicName", "Clinic name is required");
            }
            if fields.years_experience.trim().is_empty() {
                errors.insert("yearsExperience", "Years of experience is required");
            }
        }
        EnquiryKind::General => {
            if fields.subject.trim().is_empty() {
                errors.insert("subject", "Subject is required");
            }
            if fields.message.trim().is_empty() {
                errors.insert("message", "Message is required");
            }
        }
    }

    errors
}

/// `local@domain.tld` shape, no whitespace. Deliberately loose; the real
/// check is the confirmation email.
fn plausible_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !local.is_empty() && !host.is_empty() && !tld.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_fields() -> EnquiryFields {
        EnquiryFields {
            name: "Jane Tan".to_owned(),
            email: "jane@x.com".to_owned(),
            phone: "+60123456789".to_owned(),
            ..EnquiryFields::default()
        }
    }

    #[test]
    fn missing_email_is_reported() {
        let mut fields = base_fields();
        fields.email.clear();
        let errors = validate(EnquiryKind::General, &fields);
        assert_eq!(errors.get("email"), Some(&"Email is required"));
    }

    #[test]
    fn malformed_email_is_reported() {
        for bad in ["jane", "jane@x", "jane@ x.com", "@x.com", "jane@.com"] {
            let mut fields = base_fields();
            fields.email = bad.to_owned();
            let errors = validate(EnquiryKind::General, &fields);
            assert_eq!(errors.get("email"), Some(&"Email is invalid"), "{bad}");
        }
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        let mut fields = base_fields();
        fields.name = "   ".to_owned();
        let errors = validate(EnquiryKind::General, &fields);
        assert_eq!(errors.get("name"), Some(&"Name is required"));
    }

    #[test]
    fn distributor_requires_its_own_fields() {
        let errors = validate(EnquiryKind::Distributor, &base_fields());
        assert_eq!(errors.get("company"), Some(&"Company is required"));
        assert_eq!(errors.get("location"), Some(&"Location is required"));
        assert_eq!(errors.get("experience"), Some(&"Experience is required"));
        assert!(!errors.contains_key("subject"));
    }

    #[test]
    fn course_requires_practitioner_fields() {
        let errors = validate(EnquiryKind::Course, &base_fields());
        assert_eq!(errors.get("profession"), Some(&"Profession is required"));
        assert_eq!(errors.get("clinicName"), Some(&"Clinic name is required"));
        assert_eq!(
            errors.get("yearsExperience"),
            Some(&"Years of experience is required")
        );
    }

    #[test]
    fn general_contact_requires_subject_and_message() {
        let errors = validate(EnquiryKind::General, &base_fields());
        assert_eq!(errors.get("subject"), Some(&"Subject is required"));
        assert_eq!(errors.get("message"), Some(&"Message is required"));
    }

    #[test]
    fn complete_distributor_form_passes() {
        let fields = EnquiryFields {
            company: "Acme".to_owned(),
            location: "KL".to_owned(),
            experience: "5 years".to_owned(),
            ..base_fields()
        };
        assert!(validate(EnquiryKind::Distributor, &fields).is_empty());
    }
}
