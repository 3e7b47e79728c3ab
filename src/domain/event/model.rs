//! Event domain entity
//!
//! A bookable venue event tied to a company/group, with schedule,
//! contact, payment history and attachment data.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Event payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum EventStatus {
    /// Booked, no payment confirmed yet
    Pending,
    /// Deposit or partial payments received
    PartiallyPaid,
    /// Fully paid
    PaidInFull,
    /// Booking cancelled
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::PartiallyPaid => "PartiallyPaid",
            Self::PaidInFull => "PaidInFull",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "Pending" => Self::Pending,
            "PartiallyPaid" => Self::PartiallyPaid,
            "PaidInFull" => Self::PaidInFull,
            "Cancelled" => Self::Cancelled,
            _ => Self::Pending,
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One payment ledger entry.
///
/// Owned exclusively by its parent event. Entries are appended by an
/// explicit "add payment" action and removed by index; never mutated
/// in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Amount in the smallest currency unit
    pub amount: i64,
    /// Calendar date the payment was received
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Metadata for a file stored in external object storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Display name (original file name)
    pub name: String,
    /// Bucket-relative object path
    pub storage_path: String,
    /// Public URL, usable as a download fallback
    pub public_url: String,
    /// MIME type as reported at upload time
    pub mime_type: String,
}

/// A venue booking
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Service-assigned identifier (UUID string)
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Denormalized company display name
    pub company_name: String,
    /// Link to the company/group record, mandatory before save
    pub company_id: Option<String>,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub people_count: u32,
    pub location: Option<String>,
    pub description: Option<String>,
    /// Selected food packages (enumerated by the venue's menu)
    pub food_packages: Vec<String>,
    /// Amount paid to date, in the smallest currency unit.
    /// Ledger-derived whenever `payments` is non-empty.
    pub deposit: i64,
    /// Outstanding amount, in the smallest currency unit
    pub pending_amount: i64,
    pub status: EventStatus,
    pub attachments: Vec<Attachment>,
    pub payments: Vec<Payment>,
    pub updated_at: DateTime<Utc>,
    /// Username of the last editor
    pub updated_by: String,
}

impl Event {
    /// Whether the stored deposit matches the payment history.
    /// Vacuously true for events without payments.
    pub fn deposit_consistent(&self) -> bool {
        self.payments.is_empty()
            || self.deposit == self.payments.iter().map(|p| p.amount).sum::<i64>()
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event() -> Event {
        Event {
            id: "ev-1".to_string(),
            start: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 6, 2, 10, 0, 0).unwrap(),
            company_name: "Acme".to_string(),
            company_id: Some("co-1".to_string()),
            contact_name: "Jordan".to_string(),
            contact_phone: "555-0101".to_string(),
            contact_email: "jordan@acme.example".to_string(),
            people_count: 80,
            location: None,
            description: None,
            food_packages: vec!["buffet".to_string()],
            deposit: 0,
            pending_amount: 0,
            status: EventStatus::Pending,
            attachments: Vec::new(),
            payments: Vec::new(),
            updated_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            updated_by: "staff".to_string(),
        }
    }

    #[test]
    fn status_string_roundtrip() {
        for status in &[
            EventStatus::Pending,
            EventStatus::PartiallyPaid,
            EventStatus::PaidInFull,
            EventStatus::Cancelled,
        ] {
            assert_eq!(&EventStatus::from_str(status.as_str()), status);
        }
    }

    #[test]
    fn unknown_status_defaults_to_pending() {
        assert_eq!(EventStatus::from_str("Archived"), EventStatus::Pending);
    }

    #[test]
    fn deposit_consistency_ignores_manual_deposit_without_payments() {
        let mut event = sample_event();
        event.deposit = 250_000;
        assert!(event.deposit_consistent());
    }

    #[test]
    fn deposit_consistency_tracks_payment_sum() {
        let mut event = sample_event();
        event.payments = vec![
            Payment {
                amount: 100_000,
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                description: None,
            },
            Payment {
                amount: 50_000,
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                description: None,
            },
        ];
        event.deposit = 150_000;
        assert!(event.deposit_consistent());

        event.deposit = 100_000;
        assert!(!event.deposit_consistent());
    }

    #[test]
    fn payment_serializes_without_empty_description() {
        let payment = Payment {
            amount: 100_000,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            description: None,
        };
        let json = serde_json::to_string(&payment).unwrap();
        assert!(!json.contains("description"));
    }
}
