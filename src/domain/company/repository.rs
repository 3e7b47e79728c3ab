//! Company repository interface

use async_trait::async_trait;

use crate::domain::DomainResult;

use super::model::{Company, IdentificationType};

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Insert a new company (identifier already assigned)
    async fn insert(&self, company: Company) -> DomainResult<()>;

    /// Find company by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Company>>;

    /// Update an existing company
    async fn update(&self, company: Company) -> DomainResult<()>;

    /// One page of companies ordered by name, plus the total count
    async fn list(&self, page: u32, limit: u32) -> DomainResult<(Vec<Company>, u64)>;

    /// Companies whose name contains `fragment` (case-insensitive)
    async fn search_name_contains(&self, fragment: &str) -> DomainResult<Vec<Company>>;

    /// Companies whose identification number contains `fragment`
    async fn find_id_number_contains(&self, fragment: &str) -> DomainResult<Vec<Company>>;

    /// Exact identification lookup, used for the uniqueness check at
    /// creation time
    async fn find_by_identification(
        &self,
        id_type: IdentificationType,
        number: &str,
    ) -> DomainResult<Option<Company>>;
}
