//! Company DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::company::{Company, CompanyInput, IdentificationType};

/// Company details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyDto {
    pub id: String,
    pub name: String,
    /// `tax_id`, `citizen_id`, `foreigner_id` or `passport`
    pub identification_type: String,
    pub identification_number: String,
    pub contact_person: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Company> for CompanyDto {
    fn from(c: Company) -> Self {
        Self {
            id: c.id,
            name: c.name,
            identification_type: c.identification_type.as_str().to_string(),
            identification_number: c.identification_number,
            contact_person: c.contact_person,
            phone: c.phone,
            email: c.email,
            address: c.address,
            city: c.city,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

/// Create/edit company request.
///
/// Field-level required-ness differs between the two forms and is
/// enforced by the directory service, not here.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Acme Corp",
    "identification_type": "tax_id",
    "identification_number": "900123456",
    "contact_person": "Jordan Reyes",
    "phone": "555-0101",
    "email": "billing@acme.example",
    "address": "12 Main St",
    "city": "Springfield"
}))]
pub struct SaveCompanyRequest {
    #[validate(length(max = 200))]
    pub name: String,
    /// `tax_id`, `citizen_id`, `foreigner_id` or `passport`
    pub identification_type: Option<String>,
    #[validate(length(max = 50))]
    pub identification_number: String,
    #[validate(length(max = 200))]
    pub contact_person: String,
    #[validate(length(max = 50))]
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

/// Strict identification-type parse; unknown values are rejected at the
/// API boundary
pub fn parse_identification_type(s: &str) -> Option<IdentificationType> {
    match s {
        "tax_id" => Some(IdentificationType::TaxId),
        "citizen_id" => Some(IdentificationType::CitizenId),
        "foreigner_id" => Some(IdentificationType::ForeignerId),
        "passport" => Some(IdentificationType::Passport),
        _ => None,
    }
}

impl SaveCompanyRequest {
    /// Convert into domain input; fails on an unknown identification type
    pub fn into_input(self) -> Result<CompanyInput, String> {
        let identification_type = match self.identification_type.as_deref() {
            None => None,
            Some(raw) => Some(
                parse_identification_type(raw)
                    .ok_or_else(|| format!("unknown identification type '{raw}'"))?,
            ),
        };
        Ok(CompanyInput {
            name: self.name,
            identification_type,
            identification_number: self.identification_number,
            contact_person: self.contact_person,
            phone: self.phone,
            email: self.email,
            address: self.address,
            city: self.city,
        })
    }
}

/// Directory search query
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct CompanySearchQuery {
    /// Free-text name query; queries shorter than 2 characters return
    /// nothing
    pub q: String,
}

/// Directory search result with the resolution of the exact query
#[derive(Debug, Serialize, ToSchema)]
pub struct CompanySearchResponse {
    pub companies: Vec<CompanyDto>,
    /// Exact (case-insensitive) name match among the results, if any
    pub matched: Option<CompanyDto>,
    /// Whether the UI should offer creating a new company
    pub offer_create: bool,
}
