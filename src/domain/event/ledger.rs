//! Payment ledger
//!
//! Ordered list of payments embedded in an event draft. The ledger is
//! authoritative for the deposit total: callers recompute the deposit
//! from [`PaymentLedger::total`] after every mutation.

use chrono::NaiveDate;
use thiserror::Error;

use super::model::Payment;

/// Rejection reasons for an "add payment" action
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("payment amount is required and must be positive")]
    InvalidAmount,
    #[error("payment date is required")]
    MissingDate,
}

/// Raw form input for a new ledger entry, before validation
#[derive(Debug, Clone, Default)]
pub struct PaymentEntryInput {
    /// Amount in the smallest currency unit
    pub amount: Option<i64>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Ordered, append-only list of payments for one event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentLedger {
    entries: Vec<Payment>,
}

impl PaymentLedger {
    pub fn new(entries: Vec<Payment>) -> Self {
        Self { entries }
    }

    /// Validate and append an entry. Returns the recomputed total.
    pub fn add(&mut self, input: PaymentEntryInput) -> Result<i64, LedgerError> {
        let amount = match input.amount {
            Some(amount) if amount > 0 => amount,
            _ => return Err(LedgerError::InvalidAmount),
        };
        let date = input.date.ok_or(LedgerError::MissingDate)?;

        self.entries.push(Payment {
            amount,
            date,
            description: input
                .description
                .filter(|d| !d.trim().is_empty()),
        });
        Ok(self.total())
    }

    /// Remove the entry at `index` and return the recomputed total.
    ///
    /// Indexes come from the UI's own listing, so an out-of-range index is
    /// a guarded no-op rather than a panic.
    pub fn remove(&mut self, index: usize) -> i64 {
        if index < self.entries.len() {
            self.entries.remove(index);
        }
        self.total()
    }

    /// Sum of all entry amounts
    pub fn total(&self) -> i64 {
        self.entries.iter().map(|p| p.amount).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[Payment] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Payment> {
        self.entries
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(amount: i64, date: (i32, u32, u32)) -> PaymentEntryInput {
        PaymentEntryInput {
            amount: Some(amount),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2),
            description: None,
        }
    }

    #[test]
    fn add_then_remove_recomputes_total() {
        let mut ledger = PaymentLedger::default();
        assert_eq!(ledger.add(entry(100_000, (2024, 1, 1))).unwrap(), 100_000);
        assert_eq!(ledger.add(entry(50_000, (2024, 1, 15))).unwrap(), 150_000);

        assert_eq!(ledger.remove(0), 50_000);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.entries()[0].amount, 50_000);
    }

    #[test]
    fn missing_amount_is_rejected() {
        let mut ledger = PaymentLedger::default();
        let result = ledger.add(PaymentEntryInput {
            amount: None,
            date: NaiveDate::from_ymd_opt(2024, 1, 1),
            description: None,
        });
        assert_eq!(result, Err(LedgerError::InvalidAmount));
        assert!(ledger.is_empty());
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        let mut ledger = PaymentLedger::default();
        assert_eq!(
            ledger.add(entry(0, (2024, 1, 1))),
            Err(LedgerError::InvalidAmount)
        );
        assert_eq!(
            ledger.add(entry(-5, (2024, 1, 1))),
            Err(LedgerError::InvalidAmount)
        );
    }

    #[test]
    fn missing_date_is_rejected() {
        let mut ledger = PaymentLedger::default();
        let result = ledger.add(PaymentEntryInput {
            amount: Some(1_000),
            date: None,
            description: None,
        });
        assert_eq!(result, Err(LedgerError::MissingDate));
    }

    #[test]
    fn out_of_range_remove_is_a_noop() {
        let mut ledger = PaymentLedger::default();
        ledger.add(entry(75_000, (2024, 2, 1))).unwrap();

        assert_eq!(ledger.remove(5), 75_000);
        assert_eq!(ledger.len(), 1);
        // removing from an empty ledger is equally harmless
        let mut empty = PaymentLedger::default();
        assert_eq!(empty.remove(0), 0);
    }

    #[test]
    fn blank_description_is_dropped() {
        let mut ledger = PaymentLedger::default();
        ledger
            .add(PaymentEntryInput {
                amount: Some(10),
                date: NaiveDate::from_ymd_opt(2024, 3, 1),
                description: Some("   ".to_string()),
            })
            .unwrap();
        assert_eq!(ledger.entries()[0].description, None);
    }
}
