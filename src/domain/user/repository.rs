//! User repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::DomainResult;

use super::model::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user (identifier already assigned)
    async fn insert(&self, user: User) -> DomainResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    /// Login lookup: matches either username or email
    async fn find_by_username_or_email(&self, login: &str) -> DomainResult<Option<User>>;

    /// Update an existing user
    async fn update(&self, user: User) -> DomainResult<()>;

    /// Record a successful login
    async fn touch_last_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()>;

    /// Total registered users (admin bootstrap check)
    async fn count(&self) -> DomainResult<u64>;
}
