//! Event DTOs

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::services::{CalendarEntry, EventRow, FilterMode};
use crate::domain::event::{
    Attachment, Event, EventDraft, EventField, EventStatus, Payment, PaymentEntryInput,
};

/// Payment ledger entry in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentDto {
    /// Amount in the smallest currency unit
    pub amount: i64,
    /// ISO date, e.g. `2024-01-15`
    pub date: String,
    pub description: Option<String>,
}

impl From<&Payment> for PaymentDto {
    fn from(p: &Payment) -> Self {
        Self {
            amount: p.amount,
            date: p.date.to_string(),
            description: p.description.clone(),
        }
    }
}

/// Attachment metadata in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct AttachmentDto {
    pub name: String,
    pub storage_path: String,
    pub public_url: String,
    pub mime_type: String,
}

impl From<&Attachment> for AttachmentDto {
    fn from(a: &Attachment) -> Self {
        Self {
            name: a.name.clone(),
            storage_path: a.storage_path.clone(),
            public_url: a.public_url.clone(),
            mime_type: a.mime_type.clone(),
        }
    }
}

/// Event details in API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct EventDto {
    pub id: String,
    pub start: String,
    pub end: String,
    pub company_name: String,
    pub company_id: Option<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub people_count: u32,
    pub location: Option<String>,
    pub description: Option<String>,
    pub food_packages: Vec<String>,
    /// Paid to date; ledger-derived whenever payments exist
    pub deposit: i64,
    pub pending_amount: i64,
    /// `Pending`, `PartiallyPaid`, `PaidInFull` or `Cancelled`
    pub status: String,
    pub attachments: Vec<AttachmentDto>,
    pub payments: Vec<PaymentDto>,
    pub updated_at: String,
    pub updated_by: String,
}

impl From<Event> for EventDto {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            start: e.start.to_rfc3339(),
            end: e.end.to_rfc3339(),
            company_name: e.company_name,
            company_id: e.company_id,
            contact_name: e.contact_name,
            contact_phone: e.contact_phone,
            contact_email: e.contact_email,
            people_count: e.people_count,
            location: e.location,
            description: e.description,
            food_packages: e.food_packages,
            deposit: e.deposit,
            pending_amount: e.pending_amount,
            status: e.status.as_str().to_string(),
            attachments: e.attachments.iter().map(AttachmentDto::from).collect(),
            payments: e.payments.iter().map(PaymentDto::from).collect(),
            updated_at: e.updated_at.to_rfc3339(),
            updated_by: e.updated_by,
        }
    }
}

/// Create/edit event request (full replace of mutable fields)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "start": "2024-06-01T10:00:00",
    "company_name": "Acme Corp",
    "company_id": "1f6e0a46-9f16-4f2e-8b6b-2f81c2b9d111",
    "contact_name": "Jordan Reyes",
    "contact_phone": "555-0101",
    "contact_email": "jordan@acme.example",
    "people_count": 120,
    "food_packages": ["buffet", "premium-bar"],
    "status": "Pending"
}))]
pub struct SaveEventRequest {
    /// Local date-time; the end defaults to one day later
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    #[validate(length(max = 200))]
    pub company_name: String,
    pub company_id: Option<String>,
    #[validate(length(max = 200))]
    pub contact_name: String,
    #[validate(length(max = 50))]
    pub contact_phone: String,
    #[validate(length(max = 200))]
    pub contact_email: String,
    #[serde(default)]
    pub people_count: u32,
    pub location: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub food_packages: Vec<String>,
    /// Manual deposit; ignored once the event has payments
    pub deposit: Option<i64>,
    pub pending_amount: Option<i64>,
    /// `Pending`, `PartiallyPaid`, `PaidInFull` or `Cancelled`
    pub status: Option<String>,
}

/// Strict status parse; unknown values are rejected at the API boundary
pub fn parse_status(s: &str) -> Option<EventStatus> {
    match s {
        "Pending" => Some(EventStatus::Pending),
        "PartiallyPaid" => Some(EventStatus::PartiallyPaid),
        "PaidInFull" => Some(EventStatus::PaidInFull),
        "Cancelled" => Some(EventStatus::Cancelled),
        _ => None,
    }
}

impl SaveEventRequest {
    /// Fold the form fields into a draft through the typed field setters.
    /// `status` must already be parsed by the caller.
    pub fn apply_to_draft(&self, draft: &mut EventDraft, status: Option<EventStatus>) {
        draft.set_field(EventField::StartDate(self.start));
        if let Some(end) = self.end {
            draft.set_field(EventField::EndDate(end));
        }
        draft.set_field(EventField::CompanyName(self.company_name.clone()));
        draft.set_field(EventField::CompanyRef(self.company_id.clone()));
        draft.set_field(EventField::ContactName(self.contact_name.clone()));
        draft.set_field(EventField::ContactPhone(self.contact_phone.clone()));
        draft.set_field(EventField::ContactEmail(self.contact_email.clone()));
        draft.set_field(EventField::PeopleCount(self.people_count));
        draft.set_field(EventField::Location(
            self.location.clone().unwrap_or_default(),
        ));
        draft.set_field(EventField::Description(
            self.description.clone().unwrap_or_default(),
        ));
        draft.set_field(EventField::FoodPackages(self.food_packages.clone()));
        if let Some(deposit) = self.deposit {
            draft.set_field(EventField::Deposit(deposit));
        }
        if let Some(pending) = self.pending_amount {
            draft.set_field(EventField::PendingAmount(pending));
        }
        if let Some(status) = status {
            draft.set_field(EventField::Status(status));
        }
    }
}

/// Add a payment to the event's ledger
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "amount": 100000,
    "date": "2024-01-01",
    "description": "wire transfer"
}))]
pub struct AddPaymentRequest {
    /// Amount in the smallest currency unit; required and positive
    pub amount: Option<i64>,
    /// Required calendar date
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl From<AddPaymentRequest> for PaymentEntryInput {
    fn from(r: AddPaymentRequest) -> Self {
        PaymentEntryInput {
            amount: r.amount,
            date: r.date,
            description: r.description,
        }
    }
}

/// One file in an upload batch, content base64-encoded
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UploadFileRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub mime_type: Option<String>,
    pub content_base64: String,
}

/// Upload a batch of attachments; files are stored sequentially and the
/// batch stops at the first storage error
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UploadAttachmentsRequest {
    #[validate(length(min = 1, message = "at least one file is required"), nested)]
    pub files: Vec<UploadFileRequest>,
}

/// Batch result: everything attached before a possible failure, plus the
/// failure message naming the file that stopped the batch
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadBatchResponse {
    pub attached: Vec<AttachmentDto>,
    pub error: Option<String>,
}

/// Search filter mode
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FilterModeDto {
    #[default]
    ByCompany,
    BySingleDate,
    ByDateRange,
}

impl From<FilterModeDto> for FilterMode {
    fn from(mode: FilterModeDto) -> Self {
        match mode {
            FilterModeDto::ByCompany => FilterMode::ByCompany,
            FilterModeDto::BySingleDate => FilterMode::BySingleDate,
            FilterModeDto::ByDateRange => FilterMode::ByDateRange,
        }
    }
}

/// Search request; only the active mode's fields are consulted
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "mode": "by_company",
    "company_name": "acme"
}))]
pub struct SearchEventsRequest {
    #[serde(default)]
    pub mode: FilterModeDto,
    pub company_name: Option<String>,
    pub company_id_number: Option<String>,
    /// `by_single_date` mode
    pub date: Option<NaiveDate>,
    /// `by_date_range` mode
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// One search result row with denormalized company display fields
#[derive(Debug, Serialize, ToSchema)]
pub struct EventRowDto {
    pub event: EventDto,
    pub company_name: Option<String>,
    pub company_identification_number: Option<String>,
}

impl From<EventRow> for EventRowDto {
    fn from(row: EventRow) -> Self {
        Self {
            event: row.event.into(),
            company_name: row.company_name,
            company_identification_number: row.company_identification_number,
        }
    }
}

/// Calendar feed query window
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct CalendarQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Extra per-event fields the calendar widget renders in tooltips
#[derive(Debug, Serialize, ToSchema)]
pub struct CalendarExtendedProps {
    pub status: String,
    pub people_count: u32,
    pub location: Option<String>,
}

/// One calendar widget row
#[derive(Debug, Serialize, ToSchema)]
pub struct CalendarEventDto {
    pub id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    pub extended_props: CalendarExtendedProps,
}

impl From<CalendarEntry> for CalendarEventDto {
    fn from(entry: CalendarEntry) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            start: entry.start.to_rfc3339(),
            end: entry.end.to_rfc3339(),
            extended_props: CalendarExtendedProps {
                status: entry.status.as_str().to_string(),
                people_count: entry.people_count,
                location: entry.location,
            },
        }
    }
}
