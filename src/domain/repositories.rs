//! Repository provider
//!
//! Bundles the per-entity repositories behind one injection point so
//! handlers and services receive a single `Arc<dyn RepositoryProvider>`.

use crate::domain::company::CompanyRepository;
use crate::domain::event::EventRepository;
use crate::domain::user::UserRepository;

pub trait RepositoryProvider: Send + Sync {
    fn events(&self) -> &dyn EventRepository;
    fn companies(&self) -> &dyn CompanyRepository;
    fn users(&self) -> &dyn UserRepository;
}
