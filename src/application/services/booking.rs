//! Booking service
//!
//! Persistence-side use cases for events: create/update/delete, the
//! payment-ledger and attachment sub-operations that patch only those
//! fields, and the calendar feed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;

use crate::domain::event::{
    Attachment, Event, EventDraft, EventStatus, PaymentEntryInput, PaymentLedger,
};
use crate::domain::{
    CompanyRepository, DomainError, DomainResult, EventRepository, RepositoryProvider,
};

use super::attachments::{AttachmentManager, BatchUploadOutcome, DownloadOutcome, NewUpload};

/// Row shape handed to the calendar widget
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEntry {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: EventStatus,
    pub people_count: u32,
    pub location: Option<String>,
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    attachments: Arc<AttachmentManager>,
}

impl BookingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, attachments: Arc<AttachmentManager>) -> Self {
        Self { repos, attachments }
    }

    /// Validate a draft and persist it as a new booking with a fresh
    /// identifier. The linked company must exist; its stored name is
    /// taken as canonical over whatever the form carried.
    pub async fn create(&self, draft: &EventDraft, created_by: &str) -> DomainResult<Event> {
        let mut event = draft
            .serialize(created_by, Utc::now())
            .map_err(DomainError::Validation)?;

        event.company_name = self.resolve_company_name(&event).await?;
        event.id = uuid::Uuid::new_v4().to_string();

        debug!("Creating booking {} for '{}'", event.id, event.company_name);
        self.repos.events().insert(event.clone()).await?;
        Ok(event)
    }

    /// Validate a draft and fully replace the stored event's mutable
    /// fields.
    pub async fn update(
        &self,
        id: &str,
        draft: &EventDraft,
        updated_by: &str,
    ) -> DomainResult<Event> {
        let mut event = draft
            .serialize(updated_by, Utc::now())
            .map_err(DomainError::Validation)?;

        event.company_name = self.resolve_company_name(&event).await?;
        event.id = id.to_string();

        self.repos.events().update(event.clone()).await?;
        Ok(event)
    }

    pub async fn get(&self, id: &str) -> DomainResult<Event> {
        self.repos
            .events()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Event",
                field: "id",
                value: id.to_string(),
            })
    }

    pub async fn list(&self, page: u32, limit: u32) -> DomainResult<(Vec<Event>, u64)> {
        self.repos.events().list(page, limit).await
    }

    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        debug!("Deleting booking {}", id);
        self.repos.events().delete(id).await
    }

    /// Append a payment to the event's ledger and persist the patched
    /// history plus the recomputed deposit.
    pub async fn add_payment(
        &self,
        event_id: &str,
        input: PaymentEntryInput,
        updated_by: &str,
    ) -> DomainResult<Event> {
        let mut event = self.get(event_id).await?;

        let mut ledger = PaymentLedger::new(event.payments);
        let deposit = ledger
            .add(input)
            .map_err(|e| DomainError::invalid("payment", e.to_string()))?;

        self.repos
            .events()
            .set_payments(event_id, ledger.entries(), deposit, updated_by)
            .await?;

        event.payments = ledger.into_entries();
        event.deposit = deposit;
        event.updated_by = updated_by.to_string();
        Ok(event)
    }

    /// Remove the payment at `index` (out-of-range is a no-op) and
    /// persist the recomputed deposit.
    pub async fn remove_payment(
        &self,
        event_id: &str,
        index: usize,
        updated_by: &str,
    ) -> DomainResult<Event> {
        let mut event = self.get(event_id).await?;

        let mut ledger = PaymentLedger::new(event.payments);
        let deposit = ledger.remove(index);

        self.repos
            .events()
            .set_payments(event_id, ledger.entries(), deposit, updated_by)
            .await?;

        event.payments = ledger.into_entries();
        event.deposit = deposit;
        event.updated_by = updated_by.to_string();
        Ok(event)
    }

    /// Upload a batch of files and, when the event already exists,
    /// append the successful attachments to its stored list. For drafts
    /// without an identifier the records are only returned, to be folded
    /// into the draft.
    pub async fn upload_attachments(
        &self,
        event_id: Option<&str>,
        files: Vec<NewUpload>,
        updated_by: &str,
    ) -> DomainResult<BatchUploadOutcome> {
        let outcome = self.attachments.upload_batch(files, event_id).await;

        if let Some(id) = event_id {
            if !outcome.attached.is_empty() {
                let mut event = self.get(id).await?;
                event.attachments.extend(outcome.attached.iter().cloned());
                self.repos
                    .events()
                    .set_attachments(id, &event.attachments, updated_by)
                    .await?;
            }
        }

        Ok(outcome)
    }

    /// Drop the attachment at `index` from the stored list, best-effort
    /// deleting the remote object first. An out-of-range index is a
    /// no-op, so a double removal cannot fail.
    pub async fn remove_attachment(
        &self,
        event_id: &str,
        index: usize,
        updated_by: &str,
    ) -> DomainResult<Event> {
        let mut event = self.get(event_id).await?;

        if index < event.attachments.len() {
            let removed = event.attachments.remove(index);
            self.attachments.remove(&removed).await;
            self.repos
                .events()
                .set_attachments(event_id, &event.attachments, updated_by)
                .await?;
        }

        Ok(event)
    }

    pub async fn download_attachment(
        &self,
        event_id: &str,
        index: usize,
    ) -> DomainResult<(Attachment, DownloadOutcome)> {
        let event = self.get(event_id).await?;
        let attachment = event
            .attachments
            .get(index)
            .cloned()
            .ok_or(DomainError::NotFound {
                entity: "Attachment",
                field: "index",
                value: index.to_string(),
            })?;

        let outcome = self.attachments.download(&attachment).await;
        Ok((attachment, outcome))
    }

    /// Rows for the calendar view, one per event starting in `[from, to)`
    pub async fn calendar_feed(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<CalendarEntry>> {
        let events = self.repos.events().find_starting_between(from, to).await?;
        Ok(events
            .into_iter()
            .map(|e| CalendarEntry {
                id: e.id,
                title: e.company_name,
                start: e.start,
                end: e.end,
                status: e.status,
                people_count: e.people_count,
                location: e.location,
            })
            .collect())
    }

    /// Canonical company name for the event's link; absence of the
    /// linked record rejects the save.
    async fn resolve_company_name(&self, event: &Event) -> DomainResult<String> {
        let Some(company_id) = event.company_id.as_deref() else {
            return Err(DomainError::invalid(
                "company_id",
                "an existing company must be linked",
            ));
        };

        match self.repos.companies().find_by_id(company_id).await? {
            Some(company) => Ok(company.name),
            None => Err(DomainError::invalid(
                "company_id",
                "linked company does not exist",
            )),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::company::{Company, IdentificationType};
    use crate::domain::event::EventField;
    use crate::infrastructure::database::repositories::InMemoryRepositoryProvider;
    use crate::infrastructure::storage::InMemoryObjectStorage;
    use chrono::NaiveDate;

    fn naive(y: i32, m: u32, d: u32, h: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    async fn seed_company(repos: &InMemoryRepositoryProvider) -> Company {
        let now = Utc::now();
        let company = Company {
            id: "co-1".to_string(),
            name: "Acme Corp".to_string(),
            identification_type: IdentificationType::TaxId,
            identification_number: "900123".to_string(),
            contact_person: "Jordan".to_string(),
            phone: "555-0101".to_string(),
            email: None,
            address: None,
            city: None,
            created_at: now,
            updated_at: now,
        };
        repos.companies().insert(company.clone()).await.unwrap();
        company
    }

    fn draft_for(company_id: &str) -> EventDraft {
        let mut draft = EventDraft::new_booking();
        draft.set_field(EventField::StartDate(naive(2024, 6, 1, 10)));
        draft.set_field(EventField::CompanyName("acme".to_string()));
        draft.set_field(EventField::CompanyRef(Some(company_id.to_string())));
        draft.set_field(EventField::ContactName("Jordan".to_string()));
        draft.set_field(EventField::ContactPhone("555-0101".to_string()));
        draft.set_field(EventField::ContactEmail("jordan@acme.example".to_string()));
        draft
    }

    fn service(repos: Arc<InMemoryRepositoryProvider>) -> (Arc<InMemoryObjectStorage>, BookingService) {
        let storage = Arc::new(InMemoryObjectStorage::new());
        let manager = Arc::new(AttachmentManager::new(storage.clone()));
        (storage, BookingService::new(repos, manager))
    }

    #[tokio::test]
    async fn create_assigns_id_and_canonical_company_name() {
        let repos = InMemoryRepositoryProvider::shared();
        let company = seed_company(&repos).await;
        let (_, service) = service(repos.clone());

        let event = service.create(&draft_for(&company.id), "staff").await.unwrap();
        assert!(!event.id.is_empty());
        assert_eq!(event.company_name, "Acme Corp");
        assert_eq!(event.end - event.start, chrono::Duration::days(1));
    }

    #[tokio::test]
    async fn create_rejects_unresolvable_company() {
        let repos = InMemoryRepositoryProvider::shared();
        seed_company(&repos).await;
        let (_, service) = service(repos.clone());

        let result = service.create(&draft_for("co-missing"), "staff").await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn create_rejects_invalid_draft_without_persisting() {
        let repos = InMemoryRepositoryProvider::shared();
        seed_company(&repos).await;
        let (_, service) = service(repos.clone());

        let mut draft = draft_for("co-1");
        draft.set_field(EventField::CompanyRef(None));
        assert!(service.create(&draft, "staff").await.is_err());

        assert!(repos.events().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn payment_lifecycle_keeps_deposit_in_sync() {
        let repos = InMemoryRepositoryProvider::shared();
        let company = seed_company(&repos).await;
        let (_, service) = service(repos.clone());
        let event = service.create(&draft_for(&company.id), "staff").await.unwrap();

        let event = service
            .add_payment(
                &event.id,
                PaymentEntryInput {
                    amount: Some(100_000),
                    date: NaiveDate::from_ymd_opt(2024, 1, 1),
                    description: None,
                },
                "staff",
            )
            .await
            .unwrap();
        let event = service
            .add_payment(
                &event.id,
                PaymentEntryInput {
                    amount: Some(50_000),
                    date: NaiveDate::from_ymd_opt(2024, 1, 15),
                    description: None,
                },
                "staff",
            )
            .await
            .unwrap();
        assert_eq!(event.deposit, 150_000);
        assert_eq!(event.payments.len(), 2);

        let event = service.remove_payment(&event.id, 0, "staff").await.unwrap();
        assert_eq!(event.deposit, 50_000);
        assert!(event.deposit_consistent());

        // stored copy agrees
        let stored = service.get(&event.id).await.unwrap();
        assert_eq!(stored.deposit, 50_000);
    }

    #[tokio::test]
    async fn rejected_payment_leaves_event_untouched() {
        let repos = InMemoryRepositoryProvider::shared();
        let company = seed_company(&repos).await;
        let (_, service) = service(repos.clone());
        let event = service.create(&draft_for(&company.id), "staff").await.unwrap();

        let result = service
            .add_payment(
                &event.id,
                PaymentEntryInput {
                    amount: None,
                    date: NaiveDate::from_ymd_opt(2024, 1, 1),
                    description: None,
                },
                "staff",
            )
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(service.get(&event.id).await.unwrap().payments.is_empty());
    }

    #[tokio::test]
    async fn attachments_persist_and_removal_is_idempotent() {
        let repos = InMemoryRepositoryProvider::shared();
        let company = seed_company(&repos).await;
        let (storage, service) = service(repos.clone());
        let event = service.create(&draft_for(&company.id), "staff").await.unwrap();

        let outcome = service
            .upload_attachments(
                Some(&event.id),
                vec![NewUpload {
                    file_name: "contract.pdf".to_string(),
                    mime_type: "application/pdf".to_string(),
                    bytes: b"pdf".to_vec(),
                }],
                "staff",
            )
            .await
            .unwrap();
        assert!(outcome.is_complete());

        let stored = service.get(&event.id).await.unwrap();
        assert_eq!(stored.attachments.len(), 1);
        assert!(storage.contains(&stored.attachments[0].storage_path));

        let after = service.remove_attachment(&event.id, 0, "staff").await.unwrap();
        assert!(after.attachments.is_empty());

        // removing the same index again is a harmless no-op
        let again = service.remove_attachment(&event.id, 0, "staff").await.unwrap();
        assert!(again.attachments.is_empty());
    }

    #[tokio::test]
    async fn calendar_feed_maps_events_to_entries() {
        let repos = InMemoryRepositoryProvider::shared();
        let company = seed_company(&repos).await;
        let (_, service) = service(repos.clone());
        let event = service.create(&draft_for(&company.id), "staff").await.unwrap();

        let entries = service
            .calendar_feed(
                event.start - chrono::Duration::days(1),
                event.start + chrono::Duration::days(1),
            )
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, event.id);
        assert_eq!(entries[0].title, "Acme Corp");
    }
}
