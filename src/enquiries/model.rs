use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::store::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnquiryKind {
    Distributor,
    Course,
    General,
}

impl EnquiryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Distributor => "distributor",
            Self::Course => "course",
            Self::General => "general",
        }
    }
}

impl fmt::Display for EnquiryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EnquiryKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "distributor" => Ok(Self::Distributor),
            "course" => Ok(Self::Course),
            "general" => Ok(Self::General),
            other => Err(anyhow::anyhow!("unknown enquiry kind {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnquiryStatus {
    Pending,
    Contacted,
    Closed,
}

impl EnquiryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Contacted => "contacted",
            Self::Closed => "closed",
        }
    }
}

impl std::str::FromStr for EnquiryStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "contacted" => Ok(Self::Contacted),
            "closed" => Ok(Self::Closed),
            other => Err(anyhow::anyhow!("unknown enquiry status {other:?}")),
        }
    }
}

/// A stored lead. Field names on the wire keep the shape the marketing site
/// already consumes (`Id`, `type`, camelCase for the rest).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enquiry {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: EnquiryKind,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinic_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub status: EnquiryStatus,
}

impl Enquiry {
    /// Builds a stored record from submitted form fields. Type-specific
    /// fields that were left blank are dropped rather than stored empty.
    pub fn new(id: i64, kind: EnquiryKind, fields: EnquiryFields, timestamp: OffsetDateTime) -> Self {
        let EnquiryFields {
            name,
            email,
            phone,
            company,
            location,
            experience,
            profession,
            clinic_name,
            years_experience,
            subject,
            preferred_contact,
            message,
        } = fields;

        Self {
            id,
            kind,
            name,
            email,
            phone,
            company: non_empty(company),
            location: non_empty(location),
            experience: non_empty(experience),
            profession: non_empty(profession),
            clinic_name: non_empty(clinic_name),
            years_experience: non_empty(years_experience),
            subject: non_empty(subject),
            preferred_contact: non_empty(preferred_contact),
            message: non_empty(message),
            timestamp,
            status: EnquiryStatus::Pending,
        }
    }
}

impl Record for Enquiry {
    fn id(&self) -> i64 {
        self.id
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

/// The raw state of the enquiry form: every field starts out as an empty
/// string, exactly like the UI's field map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnquiryFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub location: String,
    pub experience: String,
    pub profession: String,
    pub clinic_name: String,
    pub years_experience: String,
    pub subject: String,
    pub preferred_contact: String,
    pub message: String,
}

/// `POST /enquiries` body: the enquiry kind tag plus the form fields.
#[derive(Debug, Clone, Deserialize)]
pub struct EnquiryForm {
    #[serde(rename = "type")]
    pub kind: EnquiryKind,
    #[serde(flatten)]
    pub fields: EnquiryFields,
}

/// Typed partial update. Unknown fields are rejected instead of being
/// spread into the record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnquiryPatch {
    pub status: Option<EnquiryStatus>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub experience: Option<String>,
    pub profession: Option<String>,
    pub clinic_name: Option<String>,
    pub years_experience: Option<String>,
    pub subject: Option<String>,
    pub preferred_contact: Option<String>,
    pub message: Option<String>,
}

impl EnquiryPatch {
    pub fn apply(self, enquiry: &mut Enquiry) {
        if let Some(v) = self.status {
            enquiry.status = v;
        }
        if let Some(v) = self.name {
            enquiry.name = v;
        }
        if let Some(v) = self.email {
            enquiry.email = v;
        }
        if let Some(v) = self.phone {
            enquiry.phone = v;
        }
        if let Some(v) = self.company {
            enquiry.company = non_empty(v);
        }
        if let Some(v) = self.location {
            enquiry.location = non_empty(v);
        }
        if let Some(v) = self.experience {
            enquiry.experience = non_empty(v);
        }
        if let Some(v) = self.profession {
            enquiry.profession = non_empty(v);
        }
        if let Some(v) = self.clinic_name {
            enquiry.clinic_name = non_empty(v);
        }
        if let Some(v) = self.years_experience {
            enquiry.years_experience = non_empty(v);
        }
        if let Some(v) = self.subject {
            enquiry.subject = non_empty(v);
        }
        if let Some(v) = self.preferred_contact {
            enquiry.preferred_contact = non_empty(v);
        }
        if let Some(v) = self.message {
            enquiry.message = non_empty(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optional_fields_are_dropped_on_create() {
        let mut fields = EnquiryFields::default();
        fields.name = "Jane Tan".to_owned();
        fields.email = "jane@x.com".to_owned();
        fields.phone = "+60123456789".to_owned();
        fields.company = "Acme".to_owned();

        let enquiry = Enquiry::new(
            7,
            EnquiryKind::Distributor,
            fields,
            OffsetDateTime::UNIX_EPOCH,
        );
        assert_eq!(enquiry.company.as_deref(), Some("Acme"));
        assert_eq!(enquiry.message, None);
        assert_eq!(enquiry.status, EnquiryStatus::Pending);
    }

    #[test]
    fn patch_merges_only_provided_fields() {
        let mut enquiry = Enquiry::new(
            1,
            EnquiryKind::General,
            EnquiryFields {
                name: "Aisyah".to_owned(),
                email: "a@b.co".to_owned(),
                phone: "+60-13".to_owned(),
                subject: "Pricing".to_owned(),
                message: "How much?".to_owned(),
                ..EnquiryFields::default()
            },
            OffsetDateTime::UNIX_EPOCH,
        );

        EnquiryPatch {
            status: Some(EnquiryStatus::Contacted),
            ..EnquiryPatch::default()
        }
        .apply(&mut enquiry);

        assert_eq!(enquiry.status, EnquiryStatus::Contacted);
        assert_eq!(enquiry.subject.as_deref(), Some("Pricing"));
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        let err = serde_json::from_str::<EnquiryPatch>(r#"{"Id": 99}"#);
        assert!(err.is_err());
    }

    #[test]
    fn form_deserializes_with_missing_fields_defaulted() {
        let form: EnquiryForm =
            serde_json::from_str(r#"{"type": "course", "name": "Dr. Ooi"}"#).unwrap();
        assert_eq!(form.kind, EnquiryKind::Course);
        assert_eq!(form.fields.name, "Dr. Ooi");
        assert_eq!(form.fields.email, "");
    }
}
