//! Event repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::DomainResult;

use super::model::{Attachment, Event, Payment};

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert a new event (identifier already assigned)
    async fn insert(&self, event: Event) -> DomainResult<()>;

    /// Find event by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Event>>;

    /// Full replace of all mutable fields
    async fn update(&self, event: Event) -> DomainResult<()>;

    /// Delete by ID
    async fn delete(&self, id: &str) -> DomainResult<()>;

    /// One page of events ordered ascending by start, plus the total count
    async fn list(&self, page: u32, limit: u32) -> DomainResult<(Vec<Event>, u64)>;

    /// All events (dashboard/calendar assembly)
    async fn find_all(&self) -> DomainResult<Vec<Event>>;

    /// Events whose start timestamp falls within `[from, to)`
    async fn find_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<Event>>;

    /// Events linked to any of the given companies
    async fn find_by_company_ids(&self, company_ids: &[String]) -> DomainResult<Vec<Event>>;

    /// Events whose denormalized company name contains `fragment`
    /// (case-insensitive)
    async fn find_by_company_name_contains(&self, fragment: &str) -> DomainResult<Vec<Event>>;

    /// Patch only the payment history and the derived deposit
    async fn set_payments(
        &self,
        id: &str,
        payments: &[Payment],
        deposit: i64,
        updated_by: &str,
    ) -> DomainResult<()>;

    /// Patch only the attachment list
    async fn set_attachments(
        &self,
        id: &str,
        attachments: &[Attachment],
        updated_by: &str,
    ) -> DomainResult<()>;
}
