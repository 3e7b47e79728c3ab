//! Company/group domain entity
//!
//! The billable organization or individual associated with one or more
//! events. Companies are created through the event form's
//! search-or-create flow or edited in a dedicated view; they are never
//! deleted through this system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::ValidationReport;

/// Accepted identification document types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentificationType {
    /// National tax registry number
    TaxId,
    /// National citizen ID card
    CitizenId,
    /// Resident foreigner ID
    ForeignerId,
    Passport,
}

impl IdentificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaxId => "tax_id",
            Self::CitizenId => "citizen_id",
            Self::ForeignerId => "foreigner_id",
            Self::Passport => "passport",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "tax_id" => Self::TaxId,
            "citizen_id" => Self::CitizenId,
            "foreigner_id" => Self::ForeignerId,
            "passport" => Self::Passport,
            _ => Self::TaxId,
        }
    }
}

impl std::fmt::Display for IdentificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Company/group record
#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    /// Service-assigned identifier (UUID string)
    pub id: String,
    pub name: String,
    pub identification_type: IdentificationType,
    /// Expected unique per identification type; enforced by a directory
    /// lookup at creation, not by a local constraint
    pub identification_number: String,
    pub contact_person: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Which form the input came from; the edit form relaxes some
/// required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyForm {
    Create,
    Edit,
}

/// Raw company form input, before validation
#[derive(Debug, Clone, Default)]
pub struct CompanyInput {
    pub name: String,
    pub identification_type: Option<IdentificationType>,
    pub identification_number: String,
    pub contact_person: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

impl CompanyInput {
    /// Field-level validation.
    ///
    /// The creation form requires every field; the edit form relaxes
    /// address and city to optional. Email is required on creation even
    /// though the directory itself treats it as optional.
    pub fn validate(&self, form: CompanyForm) -> Result<(), ValidationReport> {
        let mut report = ValidationReport::new();

        if self.name.trim().is_empty() {
            report.push("name", "required");
        }
        if self.identification_type.is_none() {
            report.push("identification_type", "required");
        }
        if self.identification_number.trim().is_empty() {
            report.push("identification_number", "required");
        }
        if self.contact_person.trim().is_empty() {
            report.push("contact_person", "required");
        }
        if self.phone.trim().is_empty() {
            report.push("phone", "required");
        }

        if form == CompanyForm::Create {
            if self.email.as_deref().map_or(true, |e| e.trim().is_empty()) {
                report.push("email", "required");
            }
            if self.address.as_deref().map_or(true, |a| a.trim().is_empty()) {
                report.push("address", "required");
            }
            if self.city.as_deref().map_or(true, |c| c.trim().is_empty()) {
                report.push("city", "required");
            }
        }

        report.into_result()
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn full_input() -> CompanyInput {
        CompanyInput {
            name: "Acme Corp".to_string(),
            identification_type: Some(IdentificationType::TaxId),
            identification_number: "900123456".to_string(),
            contact_person: "Jordan Reyes".to_string(),
            phone: "555-0101".to_string(),
            email: Some("billing@acme.example".to_string()),
            address: Some("12 Main St".to_string()),
            city: Some("Springfield".to_string()),
        }
    }

    #[test]
    fn identification_type_roundtrip() {
        for id_type in &[
            IdentificationType::TaxId,
            IdentificationType::CitizenId,
            IdentificationType::ForeignerId,
            IdentificationType::Passport,
        ] {
            assert_eq!(&IdentificationType::from_str(id_type.as_str()), id_type);
        }
    }

    #[test]
    fn create_requires_every_field() {
        let input = CompanyInput::default();
        let report = input.validate(CompanyForm::Create).unwrap_err();
        for field in [
            "name",
            "identification_type",
            "identification_number",
            "contact_person",
            "phone",
            "email",
            "address",
            "city",
        ] {
            assert!(report.field(field).is_some(), "missing error for {field}");
        }
    }

    #[test]
    fn edit_relaxes_address_city_email() {
        let input = CompanyInput {
            email: None,
            address: None,
            city: None,
            ..full_input()
        };
        assert!(input.validate(CompanyForm::Edit).is_ok());
        assert!(input.validate(CompanyForm::Create).is_err());
    }

    #[test]
    fn full_input_passes_creation() {
        assert!(full_input().validate(CompanyForm::Create).is_ok());
    }
}
