//! In-memory repository implementations
//!
//! Mirror the SeaORM repositories' query semantics over plain vectors.
//! Used by unit tests; also handy for demo runs without a database file.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::company::{Company, CompanyRepository, IdentificationType};
use crate::domain::event::{Attachment, Event, EventRepository, Payment};
use crate::domain::user::{User, UserRepository};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

fn not_found(entity: &'static str, id: &str) -> DomainError {
    DomainError::NotFound {
        entity,
        field: "id",
        value: id.to_string(),
    }
}

// ── Events ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryEventRepository {
    events: Mutex<Vec<Event>>,
}

impl InMemoryEventRepository {
    fn sorted(&self) -> Vec<Event> {
        let mut events = self.events.lock().unwrap().clone();
        events.sort_by_key(|e| e.start);
        events
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn insert(&self, event: Event) -> DomainResult<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Event>> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn update(&self, event: Event) -> DomainResult<()> {
        let mut events = self.events.lock().unwrap();
        match events.iter_mut().find(|e| e.id == event.id) {
            Some(slot) => {
                *slot = event;
                Ok(())
            }
            None => Err(not_found("Event", &event.id)),
        }
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let mut events = self.events.lock().unwrap();
        let before = events.len();
        events.retain(|e| e.id != id);
        if events.len() == before {
            return Err(not_found("Event", id));
        }
        Ok(())
    }

    async fn list(&self, page: u32, limit: u32) -> DomainResult<(Vec<Event>, u64)> {
        let all = self.sorted();
        let total = all.len() as u64;
        let limit = limit.max(1) as usize;
        let offset = (page.max(1) as usize - 1) * limit;
        Ok((all.into_iter().skip(offset).take(limit).collect(), total))
    }

    async fn find_all(&self) -> DomainResult<Vec<Event>> {
        Ok(self.sorted())
    }

    async fn find_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<Event>> {
        Ok(self
            .sorted()
            .into_iter()
            .filter(|e| e.start >= from && e.start < to)
            .collect())
    }

    async fn find_by_company_ids(&self, company_ids: &[String]) -> DomainResult<Vec<Event>> {
        Ok(self
            .sorted()
            .into_iter()
            .filter(|e| {
                e.company_id
                    .as_ref()
                    .map_or(false, |id| company_ids.contains(id))
            })
            .collect())
    }

    async fn find_by_company_name_contains(&self, fragment: &str) -> DomainResult<Vec<Event>> {
        let needle = fragment.to_lowercase();
        Ok(self
            .sorted()
            .into_iter()
            .filter(|e| e.company_name.to_lowercase().contains(&needle))
            .collect())
    }

    async fn set_payments(
        &self,
        id: &str,
        payments: &[Payment],
        deposit: i64,
        updated_by: &str,
    ) -> DomainResult<()> {
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| not_found("Event", id))?;
        event.payments = payments.to_vec();
        event.deposit = deposit;
        event.updated_at = Utc::now();
        event.updated_by = updated_by.to_string();
        Ok(())
    }

    async fn set_attachments(
        &self,
        id: &str,
        attachments: &[Attachment],
        updated_by: &str,
    ) -> DomainResult<()> {
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| not_found("Event", id))?;
        event.attachments = attachments.to_vec();
        event.updated_at = Utc::now();
        event.updated_by = updated_by.to_string();
        Ok(())
    }
}

// ── Companies ───────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryCompanyRepository {
    companies: Mutex<Vec<Company>>,
}

#[async_trait]
impl CompanyRepository for InMemoryCompanyRepository {
    async fn insert(&self, company: Company) -> DomainResult<()> {
        self.companies.lock().unwrap().push(company);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Company>> {
        Ok(self
            .companies
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn update(&self, company: Company) -> DomainResult<()> {
        let mut companies = self.companies.lock().unwrap();
        match companies.iter_mut().find(|c| c.id == company.id) {
            Some(slot) => {
                *slot = company;
                Ok(())
            }
            None => Err(not_found("Company", &company.id)),
        }
    }

    async fn list(&self, page: u32, limit: u32) -> DomainResult<(Vec<Company>, u64)> {
        let mut all = self.companies.lock().unwrap().clone();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        let total = all.len() as u64;
        let limit = limit.max(1) as usize;
        let offset = (page.max(1) as usize - 1) * limit;
        Ok((all.into_iter().skip(offset).take(limit).collect(), total))
    }

    async fn search_name_contains(&self, fragment: &str) -> DomainResult<Vec<Company>> {
        let needle = fragment.to_lowercase();
        Ok(self
            .companies
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn find_id_number_contains(&self, fragment: &str) -> DomainResult<Vec<Company>> {
        Ok(self
            .companies
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.identification_number.contains(fragment))
            .cloned()
            .collect())
    }

    async fn find_by_identification(
        &self,
        id_type: IdentificationType,
        number: &str,
    ) -> DomainResult<Option<Company>> {
        Ok(self
            .companies
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.identification_type == id_type && c.identification_number == number)
            .cloned())
    }
}

// ── Users ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> DomainResult<()> {
        self.users.lock().unwrap().push(user);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_by_username_or_email(&self, login: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == login || u.email == login)
            .cloned())
    }

    async fn update(&self, user: User) -> DomainResult<()> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => {
                *slot = user;
                Ok(())
            }
            None => Err(not_found("User", &user.id)),
        }
    }

    async fn touch_last_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()> {
        if let Some(user) = self.users.lock().unwrap().iter_mut().find(|u| u.id == id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.users.lock().unwrap().len() as u64)
    }
}

// ── Provider ────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    pub events: InMemoryEventRepository,
    pub companies: InMemoryCompanyRepository,
    pub users: InMemoryUserRepository,
}

impl InMemoryRepositoryProvider {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn events(&self) -> &dyn EventRepository {
        &self.events
    }

    fn companies(&self) -> &dyn CompanyRepository {
        &self.companies
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}
