//! Company directory
//!
//! Resolves free-text company input into a directory record, offering
//! create-on-miss, and keeps event drafts pointing at canonical
//! persisted values.

use std::sync::Arc;

use chrono::Utc;
use log::debug;

use crate::domain::company::{Company, CompanyForm, CompanyInput, CompanyRepository};
use crate::domain::event::EventDraft;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

/// Queries shorter than this skip the directory entirely, so typing the
/// first character never scans the full directory.
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

/// Outcome of resolving a free-text company name
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyResolution {
    /// Exact (case-insensitive) name match, when one exists
    pub matched: Option<Company>,
    /// Whether the UI should offer a "create new company" affordance
    pub offer_create: bool,
}

pub struct CompanyDirectory {
    repos: Arc<dyn RepositoryProvider>,
}

impl CompanyDirectory {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Case-insensitive substring search on company name, gated behind
    /// the minimum query length.
    pub async fn search(&self, query: &str) -> DomainResult<Vec<Company>> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_QUERY_LEN {
            return Ok(Vec::new());
        }
        self.repos.companies().search_name_contains(query).await
    }

    /// Pick the exact case-insensitive name match out of prior search
    /// results, or flag that creation should be offered.
    pub fn resolve_or_flag_new(query: &str, matches: &[Company]) -> CompanyResolution {
        let query = query.trim();
        let matched = matches
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(query))
            .cloned();
        let offer_create = matched.is_none() && !query.is_empty();
        CompanyResolution {
            matched,
            offer_create,
        }
    }

    /// Validate and persist a new company; returns the record including
    /// its assigned identifier.
    pub async fn create(&self, input: CompanyInput) -> DomainResult<Company> {
        input.validate(CompanyForm::Create)?;

        let id_type = input.identification_type.expect("validated above");
        let id_number = input.identification_number.trim().to_string();

        // identification is expected unique per type; lookup, not constraint
        if self
            .repos
            .companies()
            .find_by_identification(id_type, &id_number)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "a company with {} {} already exists",
                id_type, id_number
            )));
        }

        let now = Utc::now();
        let company = Company {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            identification_type: id_type,
            identification_number: id_number,
            contact_person: input.contact_person.trim().to_string(),
            phone: input.phone.trim().to_string(),
            email: non_blank(input.email),
            address: non_blank(input.address),
            city: non_blank(input.city),
            created_at: now,
            updated_at: now,
        };

        debug!("Creating company '{}'", company.name);
        self.repos.companies().insert(company.clone()).await?;
        Ok(company)
    }

    /// Validate and apply an edit; returns the canonical updated record.
    pub async fn update(&self, id: &str, input: CompanyInput) -> DomainResult<Company> {
        input.validate(CompanyForm::Edit)?;

        let existing = self.repos.companies().find_by_id(id).await?;
        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "Company",
                field: "id",
                value: id.to_string(),
            });
        };

        let company = Company {
            name: input.name.trim().to_string(),
            identification_type: input.identification_type.expect("validated above"),
            identification_number: input.identification_number.trim().to_string(),
            contact_person: input.contact_person.trim().to_string(),
            phone: input.phone.trim().to_string(),
            email: non_blank(input.email),
            address: non_blank(input.address),
            city: non_blank(input.city),
            updated_at: Utc::now(),
            ..existing
        };

        self.repos.companies().update(company.clone()).await?;
        Ok(company)
    }

    /// Refresh an event draft's company link to the canonical persisted
    /// name and identifier.
    pub fn refresh_draft_link(draft: &mut EventDraft, company: &Company) {
        draft.company_name = company.name.clone();
        draft.company_id = Some(company.id.clone());
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::company::IdentificationType;
    use crate::infrastructure::database::repositories::InMemoryRepositoryProvider;

    fn input(name: &str, id_number: &str) -> CompanyInput {
        CompanyInput {
            name: name.to_string(),
            identification_type: Some(IdentificationType::TaxId),
            identification_number: id_number.to_string(),
            contact_person: "Jordan Reyes".to_string(),
            phone: "555-0101".to_string(),
            email: Some("billing@acme.example".to_string()),
            address: Some("12 Main St".to_string()),
            city: Some("Springfield".to_string()),
        }
    }

    fn directory() -> (Arc<InMemoryRepositoryProvider>, CompanyDirectory) {
        let repos = InMemoryRepositoryProvider::shared();
        let directory = CompanyDirectory::new(repos.clone());
        (repos, directory)
    }

    #[tokio::test]
    async fn short_queries_skip_the_directory() {
        let (_, directory) = directory();
        directory.create(input("Acme Corp", "900123")).await.unwrap();

        assert!(directory.search("").await.unwrap().is_empty());
        assert!(directory.search("a").await.unwrap().is_empty());
        assert_eq!(directory.search("ac").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let (_, directory) = directory();
        directory.create(input("Acme Corp", "900123")).await.unwrap();
        directory.create(input("Beta Ltd", "900456")).await.unwrap();

        let hits = directory.search("CME").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Acme Corp");
    }

    #[tokio::test]
    async fn resolve_picks_exact_name_ignoring_case() {
        let (_, directory) = directory();
        directory.create(input("Acme", "900123")).await.unwrap();
        let matches = directory.search("acme").await.unwrap();

        let resolution = CompanyDirectory::resolve_or_flag_new("ACME", &matches);
        assert_eq!(resolution.matched.unwrap().name, "Acme");
        assert!(!resolution.offer_create);
    }

    #[tokio::test]
    async fn resolve_offers_create_on_miss() {
        let (_, directory) = directory();
        directory.create(input("Acme", "900123")).await.unwrap();
        let matches = directory.search("acme").await.unwrap();

        let resolution = CompanyDirectory::resolve_or_flag_new("Acme Holdings", &matches);
        assert!(resolution.matched.is_none());
        assert!(resolution.offer_create);
    }

    #[test]
    fn resolve_never_offers_create_for_blank_query() {
        let resolution = CompanyDirectory::resolve_or_flag_new("   ", &[]);
        assert!(resolution.matched.is_none());
        assert!(!resolution.offer_create);
    }

    #[tokio::test]
    async fn create_assigns_identifier_and_trims() {
        let (_, directory) = directory();
        let company = directory.create(input("  Acme Corp ", "900123")).await.unwrap();
        assert!(!company.id.is_empty());
        assert_eq!(company.name, "Acme Corp");
    }

    #[tokio::test]
    async fn duplicate_identification_is_a_conflict() {
        let (_, directory) = directory();
        directory.create(input("Acme", "900123")).await.unwrap();

        let result = directory.create(input("Acme Clone", "900123")).await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn create_rejects_incomplete_input() {
        let (_, directory) = directory();
        let result = directory
            .create(CompanyInput {
                city: None,
                ..input("Acme", "900123")
            })
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn update_returns_canonical_record() {
        let (_, directory) = directory();
        let company = directory.create(input("Acme", "900123")).await.unwrap();

        let updated = directory
            .update(
                &company.id,
                CompanyInput {
                    address: None,
                    city: None,
                    ..input("Acme Renamed", "900123")
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.id, company.id);
        assert_eq!(updated.name, "Acme Renamed");
        assert_eq!(updated.address, None);
    }

    #[tokio::test]
    async fn draft_link_refresh_uses_persisted_values() {
        let (_, directory) = directory();
        let company = directory.create(input("Acme Corp", "900123")).await.unwrap();

        let mut draft = EventDraft::new_booking();
        draft.company_name = "acme corp".to_string();
        CompanyDirectory::refresh_draft_link(&mut draft, &company);

        assert_eq!(draft.company_name, "Acme Corp");
        assert_eq!(draft.company_id.as_deref(), Some(company.id.as_str()));
    }
}
