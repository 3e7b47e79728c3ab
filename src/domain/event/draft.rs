//! Event draft
//!
//! Holds the authoritative in-progress copy of one event being created or
//! edited, validates it, and serializes it back into an [`Event`]. All
//! operations here are pure transforms; persistence is delegated to the
//! repository layer.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};

use crate::domain::error::ValidationReport;

use super::ledger::PaymentLedger;
use super::model::{Attachment, Event, EventStatus};

/// Typed field setters for [`EventDraft::set_field`].
///
/// One variant per editable form field, so a typo in a field name is a
/// compile error instead of a silently ignored update.
#[derive(Debug, Clone)]
pub enum EventField {
    StartDate(NaiveDateTime),
    EndDate(NaiveDateTime),
    CompanyName(String),
    CompanyRef(Option<String>),
    ContactName(String),
    ContactPhone(String),
    ContactEmail(String),
    PeopleCount(u32),
    Location(String),
    Description(String),
    FoodPackages(Vec<String>),
    Deposit(i64),
    PendingAmount(i64),
    Status(EventStatus),
}

/// In-progress copy of one event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDraft {
    /// Absent while creating a new booking
    pub id: Option<String>,
    /// Editable local date-time; converted to UTC on serialization
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub company_name: String,
    pub company_id: Option<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub people_count: u32,
    pub location: String,
    pub description: String,
    pub food_packages: Vec<String>,
    pub deposit: i64,
    pub pending_amount: i64,
    pub status: Option<EventStatus>,
    pub attachments: Vec<Attachment>,
    pub ledger: PaymentLedger,
}

impl EventDraft {
    /// Fresh draft for a new booking. Status defaults to Pending,
    /// collections default to empty.
    pub fn new_booking() -> Self {
        Self {
            status: Some(EventStatus::Pending),
            ..Self::default()
        }
    }

    /// Draft pre-filled from an existing event, timestamps reformatted
    /// into editable local date-times.
    pub fn from_existing(event: &Event) -> Self {
        Self {
            id: Some(event.id.clone()),
            start: Some(event.start.naive_utc()),
            end: Some(event.end.naive_utc()),
            company_name: event.company_name.clone(),
            company_id: event.company_id.clone(),
            contact_name: event.contact_name.clone(),
            contact_phone: event.contact_phone.clone(),
            contact_email: event.contact_email.clone(),
            people_count: event.people_count,
            location: event.location.clone().unwrap_or_default(),
            description: event.description.clone().unwrap_or_default(),
            food_packages: event.food_packages.clone(),
            deposit: event.deposit,
            pending_amount: event.pending_amount,
            status: Some(event.status),
            attachments: event.attachments.clone(),
            ledger: PaymentLedger::new(event.payments.clone()),
        }
    }

    /// Apply a single field edit.
    ///
    /// Editing the start date recomputes `end = start + 1 day`; the end
    /// date only deviates from that when edited directly afterwards.
    /// While the ledger is non-empty the deposit is ledger-derived and a
    /// direct deposit edit is ignored.
    pub fn set_field(&mut self, field: EventField) {
        match field {
            EventField::StartDate(start) => {
                self.start = Some(start);
                self.end = Some(start + Duration::days(1));
            }
            EventField::EndDate(end) => self.end = Some(end),
            EventField::CompanyName(name) => self.company_name = name,
            EventField::CompanyRef(id) => self.company_id = id,
            EventField::ContactName(name) => self.contact_name = name,
            EventField::ContactPhone(phone) => self.contact_phone = phone,
            EventField::ContactEmail(email) => self.contact_email = email,
            EventField::PeopleCount(count) => self.people_count = count,
            EventField::Location(location) => self.location = location,
            EventField::Description(description) => self.description = description,
            EventField::FoodPackages(packages) => self.food_packages = packages,
            EventField::Deposit(amount) => {
                if self.ledger.is_empty() {
                    self.deposit = amount;
                }
            }
            EventField::PendingAmount(amount) => self.pending_amount = amount,
            EventField::Status(status) => self.status = Some(status),
        }
        self.sync_deposit();
    }

    /// Recompute the deposit from the ledger. No-op while the ledger is
    /// empty (manual deposit entry stays untouched).
    pub fn sync_deposit(&mut self) {
        if !self.ledger.is_empty() {
            self.deposit = self.ledger.total();
        }
    }

    /// Field-level validation. Failures block submission and are meant
    /// to render inline next to the offending field.
    pub fn validate(&self) -> Result<(), ValidationReport> {
        let mut report = ValidationReport::new();

        if self.company_id.as_deref().map_or(true, str::is_empty) {
            report.push("company_id", "an existing company must be linked");
        }
        if self.company_name.trim().is_empty() {
            report.push("company_name", "required");
        }
        if self.contact_name.trim().is_empty() {
            report.push("contact_name", "required");
        }
        if self.contact_phone.trim().is_empty() {
            report.push("contact_phone", "required");
        }
        if self.contact_email.trim().is_empty() {
            report.push("contact_email", "required");
        } else if !is_valid_email(self.contact_email.trim()) {
            report.push("contact_email", "invalid email address");
        }

        // a missing end is fine: serialization defaults it to start + 1 day
        match (self.start, self.end) {
            (None, _) => report.push("start", "required"),
            (Some(start), Some(end)) if end < start => {
                report.push("end", "end must not precede start");
            }
            _ => {}
        }

        if self.status.is_none() {
            report.push("status", "required");
        }

        report.into_result()
    }

    /// Validate and convert into a persistable [`Event`].
    ///
    /// Local date-times become absolute UTC timestamps, the identifier is
    /// stripped on create (the caller assigns one), optional text fields
    /// collapse blank input to `None`, and the deposit is re-derived from
    /// the ledger one final time.
    pub fn serialize(
        &self,
        updated_by: &str,
        now: DateTime<Utc>,
    ) -> Result<Event, ValidationReport> {
        self.validate()?;

        let start = self.start.expect("validated above");
        let end = self.end.unwrap_or(start + Duration::days(1));

        let deposit = if self.ledger.is_empty() {
            self.deposit
        } else {
            self.ledger.total()
        };

        Ok(Event {
            id: self.id.clone().unwrap_or_default(),
            start: Utc.from_utc_datetime(&start),
            end: Utc.from_utc_datetime(&end),
            company_name: self.company_name.trim().to_string(),
            company_id: self.company_id.clone(),
            contact_name: self.contact_name.trim().to_string(),
            contact_phone: self.contact_phone.trim().to_string(),
            contact_email: self.contact_email.trim().to_string(),
            people_count: self.people_count,
            location: non_blank(&self.location),
            description: non_blank(&self.description),
            food_packages: self.food_packages.clone(),
            deposit,
            pending_amount: self.pending_amount,
            status: self.status.expect("validated above"),
            attachments: self.attachments.clone(),
            payments: self.ledger.entries().to_vec(),
            updated_at: now,
            updated_by: updated_by.to_string(),
        })
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Basic email shape check: one `@`, non-empty local part, dotted domain,
/// no whitespace. Deliberately loose; deliverability is not our problem.
fn is_valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = s.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let Some(domain) = parts.next() else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::ledger::PaymentEntryInput;
    use chrono::NaiveDate;

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn filled_draft() -> EventDraft {
        let mut draft = EventDraft::new_booking();
        draft.set_field(EventField::StartDate(naive(2024, 6, 1, 10, 0)));
        draft.set_field(EventField::CompanyName("Acme".to_string()));
        draft.set_field(EventField::CompanyRef(Some("co-1".to_string())));
        draft.set_field(EventField::ContactName("Jordan".to_string()));
        draft.set_field(EventField::ContactPhone("555-0101".to_string()));
        draft.set_field(EventField::ContactEmail("jordan@acme.example".to_string()));
        draft.set_field(EventField::PeopleCount(120));
        draft
    }

    #[test]
    fn new_booking_defaults_to_pending() {
        let draft = EventDraft::new_booking();
        assert_eq!(draft.status, Some(EventStatus::Pending));
        assert!(draft.food_packages.is_empty());
        assert!(draft.attachments.is_empty());
        assert!(draft.ledger.is_empty());
    }

    #[test]
    fn setting_start_recomputes_end_plus_one_day() {
        let mut draft = EventDraft::new_booking();
        draft.set_field(EventField::StartDate(naive(2024, 6, 1, 10, 0)));
        assert_eq!(draft.end, Some(naive(2024, 6, 2, 10, 0)));
    }

    #[test]
    fn direct_end_edit_survives() {
        let mut draft = filled_draft();
        draft.set_field(EventField::EndDate(naive(2024, 6, 3, 18, 0)));
        assert_eq!(draft.end, Some(naive(2024, 6, 3, 18, 0)));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn end_before_start_fails_validation() {
        let mut draft = filled_draft();
        draft.set_field(EventField::EndDate(naive(2024, 5, 30, 10, 0)));
        let report = draft.validate().unwrap_err();
        assert_eq!(report.field("end"), Some("end must not precede start"));
    }

    #[test]
    fn missing_company_ref_blocks_save() {
        let mut draft = filled_draft();
        draft.set_field(EventField::CompanyRef(None));
        let report = draft.validate().unwrap_err();
        assert!(report.field("company_id").is_some());
    }

    #[test]
    fn malformed_email_is_reported_on_its_field() {
        let mut draft = filled_draft();
        draft.set_field(EventField::ContactEmail("not-an-email".to_string()));
        let report = draft.validate().unwrap_err();
        assert_eq!(report.field("contact_email"), Some("invalid email address"));
    }

    #[test]
    fn blank_contact_fields_are_reported() {
        let mut draft = filled_draft();
        draft.set_field(EventField::ContactName("  ".to_string()));
        draft.set_field(EventField::ContactPhone(String::new()));
        let report = draft.validate().unwrap_err();
        assert_eq!(report.field("contact_name"), Some("required"));
        assert_eq!(report.field("contact_phone"), Some("required"));
    }

    #[test]
    fn manual_deposit_allowed_only_without_payments() {
        let mut draft = filled_draft();
        draft.set_field(EventField::Deposit(200_000));
        assert_eq!(draft.deposit, 200_000);

        draft
            .ledger
            .add(PaymentEntryInput {
                amount: Some(100_000),
                date: NaiveDate::from_ymd_opt(2024, 1, 1),
                description: None,
            })
            .unwrap();
        draft.sync_deposit();
        assert_eq!(draft.deposit, 100_000);

        // the ledger stays authoritative over later manual edits
        draft.set_field(EventField::Deposit(999_999));
        assert_eq!(draft.deposit, 100_000);
    }

    #[test]
    fn serialize_strips_id_for_new_bookings() {
        let draft = filled_draft();
        let event = draft.serialize("staff", Utc::now()).unwrap();
        assert!(event.id.is_empty());
        assert_eq!(event.company_name, "Acme");
        assert_eq!(event.status, EventStatus::Pending);
    }

    #[test]
    fn serialize_defaults_end_to_start_plus_one_day() {
        let mut draft = filled_draft();
        draft.end = None;
        let event = draft.serialize("staff", Utc::now()).unwrap();
        assert_eq!(event.end - event.start, Duration::days(1));
    }

    #[test]
    fn serialize_collapses_blank_optional_text() {
        let mut draft = filled_draft();
        draft.set_field(EventField::Location("  ".to_string()));
        draft.set_field(EventField::Description("Garden wedding".to_string()));
        let event = draft.serialize("staff", Utc::now()).unwrap();
        assert_eq!(event.location, None);
        assert_eq!(event.description.as_deref(), Some("Garden wedding"));
    }

    #[test]
    fn roundtrip_through_existing_event() {
        let event = filled_draft().serialize("staff", Utc::now()).unwrap();
        let draft = EventDraft::from_existing(&event);
        assert_eq!(draft.id.as_deref(), Some(""));
        assert_eq!(draft.company_name, event.company_name);
        assert_eq!(draft.start, Some(event.start.naive_utc()));
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.domain.example"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@domain.co"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@domain"));
        assert!(!is_valid_email("user name@domain.co"));
        assert!(!is_valid_email("user@.domain.co"));
    }
}
