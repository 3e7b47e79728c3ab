//! Event search
//!
//! Translates a staff-selected filter mode into repository queries and
//! assembles denormalized display rows. The search runs only on explicit
//! request; switching modes clears the other modes' fields.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::domain::company::{Company, CompanyRepository};
use crate::domain::event::{Event, EventRepository};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Mutually exclusive filter modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    ByCompany,
    BySingleDate,
    ByDateRange,
}

/// Filter fields across all modes; only the active mode's fields are
/// consulted by [`EventSearch::execute`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub company_name: Option<String>,
    pub company_id_number: Option<String>,
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl SearchFilters {
    /// Defensive reset when the mode changes: fields belonging to the
    /// other modes are cleared, the new mode's fields are kept.
    pub fn reset_for_mode(&mut self, mode: FilterMode) {
        match mode {
            FilterMode::ByCompany => {
                self.date = None;
                self.from = None;
                self.to = None;
            }
            FilterMode::BySingleDate => {
                self.company_name = None;
                self.company_id_number = None;
                self.from = None;
                self.to = None;
            }
            FilterMode::ByDateRange => {
                self.company_name = None;
                self.company_id_number = None;
                self.date = None;
            }
        }
    }
}

/// One result row: the event plus denormalized company display fields
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub event: Event,
    /// Canonical company name, when the event carries a company link
    pub company_name: Option<String>,
    pub company_identification_number: Option<String>,
}

pub struct EventSearch {
    repos: Arc<dyn RepositoryProvider>,
}

impl EventSearch {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Run the query for the given mode and enrich the result rows.
    ///
    /// Any repository error aborts the whole search; no partially
    /// enriched rows are returned. Results come back sorted ascending by
    /// start timestamp.
    pub async fn execute(
        &self,
        mode: FilterMode,
        filters: &SearchFilters,
    ) -> DomainResult<Vec<EventRow>> {
        let events = match mode {
            FilterMode::ByCompany => self.query_by_company(filters).await?,
            FilterMode::BySingleDate => {
                let date = filters
                    .date
                    .ok_or_else(|| DomainError::invalid("date", "required"))?;
                let (from, to) = day_bounds(date, 1);
                self.repos.events().find_starting_between(from, to).await?
            }
            FilterMode::ByDateRange => {
                let first = filters
                    .from
                    .ok_or_else(|| DomainError::invalid("from", "required"))?;
                let last = filters
                    .to
                    .ok_or_else(|| DomainError::invalid("to", "required"))?;
                if last < first {
                    return Err(DomainError::invalid("to", "must not precede from"));
                }
                let days = (last - first).num_days() + 1;
                let (from, to) = day_bounds(first, days);
                self.repos.events().find_starting_between(from, to).await?
            }
        };

        let mut rows = self.enrich(events).await?;
        rows.sort_by_key(|row| row.event.start);
        Ok(rows)
    }

    async fn query_by_company(&self, filters: &SearchFilters) -> DomainResult<Vec<Event>> {
        let name = non_blank(filters.company_name.as_deref());
        let id_number = non_blank(filters.company_id_number.as_deref());

        if let Some(id_number) = id_number {
            let companies = self
                .repos
                .companies()
                .find_id_number_contains(id_number)
                .await?;
            if companies.is_empty() {
                // nothing can match; skip the events query entirely
                return Ok(Vec::new());
            }

            let ids: Vec<String> = companies.into_iter().map(|c| c.id).collect();
            let mut events = self.repos.events().find_by_company_ids(&ids).await?;
            if let Some(name) = name {
                let needle = name.to_lowercase();
                events.retain(|e| e.company_name.to_lowercase().contains(&needle));
            }
            return Ok(events);
        }

        if let Some(name) = name {
            return self.repos.events().find_by_company_name_contains(name).await;
        }

        self.repos.events().find_all().await
    }

    /// Second pass: attach canonical company fields to every row whose
    /// event carries a company reference. Lookups are deduplicated; a
    /// lookup error aborts the search.
    async fn enrich(&self, events: Vec<Event>) -> DomainResult<Vec<EventRow>> {
        let mut companies: HashMap<String, Company> = HashMap::new();
        for event in &events {
            if let Some(id) = event.company_id.as_deref() {
                if !companies.contains_key(id) {
                    if let Some(company) = self.repos.companies().find_by_id(id).await? {
                        companies.insert(id.to_string(), company);
                    }
                }
            }
        }

        Ok(events
            .into_iter()
            .map(|event| {
                let company = event
                    .company_id
                    .as_deref()
                    .and_then(|id| companies.get(id));
                EventRow {
                    company_name: company.map(|c| c.name.clone()),
                    company_identification_number: company
                        .map(|c| c.identification_number.clone()),
                    event,
                }
            })
            .collect())
    }
}

/// UTC-normalized `[start-of-day, start-of-day + days)` bounds
fn day_bounds(date: NaiveDate, days: i64) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default());
    (start, start + Duration::days(days))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::company::IdentificationType;
    use crate::domain::event::EventStatus;
    use crate::infrastructure::database::repositories::InMemoryRepositoryProvider;

    fn company(id: &str, name: &str, id_number: &str) -> Company {
        let now = Utc::now();
        Company {
            id: id.to_string(),
            name: name.to_string(),
            identification_type: IdentificationType::TaxId,
            identification_number: id_number.to_string(),
            contact_person: "Jordan".to_string(),
            phone: "555-0101".to_string(),
            email: None,
            address: None,
            city: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn event(id: &str, company_id: Option<&str>, company_name: &str, start: DateTime<Utc>) -> Event {
        Event {
            id: id.to_string(),
            start,
            end: start + Duration::days(1),
            company_name: company_name.to_string(),
            company_id: company_id.map(String::from),
            contact_name: "Jordan".to_string(),
            contact_phone: "555-0101".to_string(),
            contact_email: "jordan@acme.example".to_string(),
            people_count: 50,
            location: None,
            description: None,
            food_packages: Vec::new(),
            deposit: 0,
            pending_amount: 0,
            status: EventStatus::Pending,
            attachments: Vec::new(),
            payments: Vec::new(),
            updated_at: start,
            updated_by: "staff".to_string(),
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    async fn seeded() -> (Arc<InMemoryRepositoryProvider>, EventSearch) {
        let repos = InMemoryRepositoryProvider::shared();
        repos.companies.insert(company("co-1", "Acme Corp", "900123")).await.unwrap();
        repos.companies.insert(company("co-2", "Beta Ltd", "800456")).await.unwrap();
        repos
            .events
            .insert(event("ev-1", Some("co-1"), "Acme Corp", at(2024, 6, 5, 12)))
            .await
            .unwrap();
        repos
            .events
            .insert(event("ev-2", Some("co-2"), "Beta Ltd", at(2024, 6, 1, 9)))
            .await
            .unwrap();
        repos
            .events
            .insert(event("ev-3", None, "Walk-in", at(2024, 6, 3, 18)))
            .await
            .unwrap();
        let search = EventSearch::new(repos.clone());
        (repos, search)
    }

    #[tokio::test]
    async fn default_company_search_returns_everything_sorted() {
        let (_, search) = seeded().await;
        let rows = search
            .execute(FilterMode::ByCompany, &SearchFilters::default())
            .await
            .unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.event.id.as_str()).collect();
        assert_eq!(ids, vec!["ev-2", "ev-3", "ev-1"]);
    }

    #[tokio::test]
    async fn name_filter_is_case_insensitive() {
        let (_, search) = seeded().await;
        let rows = search
            .execute(
                FilterMode::ByCompany,
                &SearchFilters {
                    company_name: Some("acme".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event.id, "ev-1");
    }

    #[tokio::test]
    async fn unmatched_id_number_short_circuits_to_empty() {
        let (_, search) = seeded().await;
        // the name alone would match, yet the id-number miss wins
        let rows = search
            .execute(
                FilterMode::ByCompany,
                &SearchFilters {
                    company_name: Some("Acme".to_string()),
                    company_id_number: Some("999999".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn id_number_filter_resolves_companies_first() {
        let (_, search) = seeded().await;
        let rows = search
            .execute(
                FilterMode::ByCompany,
                &SearchFilters {
                    company_id_number: Some("9001".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event.id, "ev-1");
        assert_eq!(
            rows[0].company_identification_number.as_deref(),
            Some("900123")
        );
    }

    #[tokio::test]
    async fn single_date_uses_half_open_day_bounds() {
        let (repos, search) = seeded().await;
        // midnight of the following day is outside the window
        repos
            .events
            .insert(event("ev-4", None, "Edge", at(2024, 6, 6, 0)))
            .await
            .unwrap();

        let rows = search
            .execute(
                FilterMode::BySingleDate,
                &SearchFilters {
                    date: NaiveDate::from_ymd_opt(2024, 6, 5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.event.id.as_str()).collect();
        assert_eq!(ids, vec!["ev-1"]);
    }

    #[tokio::test]
    async fn date_range_includes_whole_last_day() {
        let (_, search) = seeded().await;
        let rows = search
            .execute(
                FilterMode::ByDateRange,
                &SearchFilters {
                    from: NaiveDate::from_ymd_opt(2024, 6, 1),
                    to: NaiveDate::from_ymd_opt(2024, 6, 3),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.event.id.as_str()).collect();
        assert_eq!(ids, vec!["ev-2", "ev-3"]);
    }

    #[tokio::test]
    async fn missing_date_is_a_field_error() {
        let (_, search) = seeded().await;
        let result = search
            .execute(FilterMode::BySingleDate, &SearchFilters::default())
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn enrichment_attaches_canonical_company_fields() {
        let (_, search) = seeded().await;
        let rows = search
            .execute(FilterMode::ByCompany, &SearchFilters::default())
            .await
            .unwrap();

        let acme = rows.iter().find(|r| r.event.id == "ev-1").unwrap();
        assert_eq!(acme.company_name.as_deref(), Some("Acme Corp"));
        assert_eq!(acme.company_identification_number.as_deref(), Some("900123"));

        let walk_in = rows.iter().find(|r| r.event.id == "ev-3").unwrap();
        assert_eq!(walk_in.company_name, None);
        assert_eq!(walk_in.company_identification_number, None);
    }

    #[test]
    fn mode_switch_clears_other_modes_fields() {
        let mut filters = SearchFilters {
            company_name: Some("Acme".to_string()),
            company_id_number: Some("900".to_string()),
            date: NaiveDate::from_ymd_opt(2024, 6, 5),
            from: NaiveDate::from_ymd_opt(2024, 6, 1),
            to: NaiveDate::from_ymd_opt(2024, 6, 3),
        };

        filters.reset_for_mode(FilterMode::BySingleDate);
        assert_eq!(filters.company_name, None);
        assert_eq!(filters.company_id_number, None);
        assert!(filters.date.is_some());
        assert_eq!(filters.from, None);
        assert_eq!(filters.to, None);
    }
}
