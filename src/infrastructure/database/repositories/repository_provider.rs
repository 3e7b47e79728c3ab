//! SeaORM-backed repository provider

use sea_orm::DatabaseConnection;

use crate::domain::company::CompanyRepository;
use crate::domain::event::EventRepository;
use crate::domain::user::UserRepository;
use crate::domain::RepositoryProvider;

use super::company_repository::SeaOrmCompanyRepository;
use super::event_repository::SeaOrmEventRepository;
use super::user_repository::SeaOrmUserRepository;

pub struct SeaOrmRepositoryProvider {
    events: SeaOrmEventRepository,
    companies: SeaOrmCompanyRepository,
    users: SeaOrmUserRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            events: SeaOrmEventRepository::new(db.clone()),
            companies: SeaOrmCompanyRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
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
