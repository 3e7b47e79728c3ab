//! SeaORM implementation of CompanyRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::company::{Company, CompanyRepository, IdentificationType};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::company_group;

pub struct SeaOrmCompanyRepository {
    db: DatabaseConnection,
}

impl SeaOrmCompanyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: company_group::Model) -> Company {
    Company {
        id: m.id,
        name: m.name,
        identification_type: IdentificationType::from_str(&m.identification_type),
        identification_number: m.identification_number,
        contact_person: m.contact_person,
        phone: m.phone,
        email: m.email,
        address: m.address,
        city: m.city,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn domain_to_model(c: &Company) -> company_group::ActiveModel {
    company_group::ActiveModel {
        id: Set(c.id.clone()),
        name: Set(c.name.clone()),
        identification_type: Set(c.identification_type.as_str().to_string()),
        identification_number: Set(c.identification_number.clone()),
        contact_person: Set(c.contact_person.clone()),
        phone: Set(c.phone.clone()),
        email: Set(c.email.clone()),
        address: Set(c.address.clone()),
        city: Set(c.city.clone()),
        created_at: Set(c.created_at),
        updated_at: Set(c.updated_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {e}"))
}

// ── CompanyRepository impl ──────────────────────────────────────

#[async_trait]
impl CompanyRepository for SeaOrmCompanyRepository {
    async fn insert(&self, c: Company) -> DomainResult<()> {
        debug!("Inserting company: {}", c.id);
        domain_to_model(&c).insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Company>> {
        let model = company_group::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn update(&self, c: Company) -> DomainResult<()> {
        debug!("Updating company: {}", c.id);

        let existing = company_group::Entity::find_by_id(&c.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Company",
                field: "id",
                value: c.id.clone(),
            });
        }

        domain_to_model(&c).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn list(&self, page: u32, limit: u32) -> DomainResult<(Vec<Company>, u64)> {
        let paginator = company_group::Entity::find()
            .order_by_asc(company_group::Column::Name)
            .paginate(&self.db, limit.max(1) as u64);

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.max(1) as u64 - 1)
            .await
            .map_err(db_err)?;
        Ok((models.into_iter().map(model_to_domain).collect(), total))
    }

    async fn search_name_contains(&self, fragment: &str) -> DomainResult<Vec<Company>> {
        let models = company_group::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(company_group::Column::Name)))
                    .like(format!("%{}%", fragment.to_lowercase())),
            )
            .order_by_asc(company_group::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_id_number_contains(&self, fragment: &str) -> DomainResult<Vec<Company>> {
        let models = company_group::Entity::find()
            .filter(company_group::Column::IdentificationNumber.contains(fragment))
            .order_by_asc(company_group::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_identification(
        &self,
        id_type: IdentificationType,
        number: &str,
    ) -> DomainResult<Option<Company>> {
        let model = company_group::Entity::find()
            .filter(company_group::Column::IdentificationType.eq(id_type.as_str()))
            .filter(company_group::Column::IdentificationNumber.eq(number))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }
}
