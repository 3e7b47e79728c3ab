//! SeaORM implementation of EventRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::event::{Attachment, Event, EventRepository, EventStatus, Payment};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::event;

pub struct SeaOrmEventRepository {
    db: DatabaseConnection,
}

impl SeaOrmEventRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: event::Model) -> DomainResult<Event> {
    let payments: Vec<Payment> = serde_json::from_str(&m.payments)
        .map_err(|e| DomainError::Storage(format!("corrupt payments column: {e}")))?;
    let attachments: Vec<Attachment> = serde_json::from_str(&m.attachments)
        .map_err(|e| DomainError::Storage(format!("corrupt attachments column: {e}")))?;

    Ok(Event {
        id: m.id,
        start: m.start_at,
        end: m.end_at,
        company_name: m.company_name,
        company_id: m.company_group_id,
        contact_name: m.contact_name,
        contact_phone: m.contact_phone,
        contact_email: m.contact_email,
        people_count: m.people_count.max(0) as u32,
        location: m.location,
        description: m.description,
        food_packages: split_packages(&m.food_packages),
        deposit: m.deposit,
        pending_amount: m.pending_amount,
        status: EventStatus::from_str(&m.status),
        attachments,
        payments,
        updated_at: m.updated_at,
        updated_by: m.updated_by,
    })
}

fn domain_to_model(e: &Event) -> DomainResult<event::ActiveModel> {
    Ok(event::ActiveModel {
        id: Set(e.id.clone()),
        start_at: Set(e.start),
        end_at: Set(e.end),
        company_name: Set(e.company_name.clone()),
        company_group_id: Set(e.company_id.clone()),
        contact_name: Set(e.contact_name.clone()),
        contact_phone: Set(e.contact_phone.clone()),
        contact_email: Set(e.contact_email.clone()),
        people_count: Set(e.people_count as i32),
        location: Set(e.location.clone()),
        description: Set(e.description.clone()),
        food_packages: Set(join_packages(&e.food_packages)),
        deposit: Set(e.deposit),
        pending_amount: Set(e.pending_amount),
        status: Set(e.status.as_str().to_string()),
        payments: Set(encode_json(&e.payments)?),
        attachments: Set(encode_json(&e.attachments)?),
        updated_at: Set(e.updated_at),
        updated_by: Set(e.updated_by.clone()),
    })
}

fn encode_json<T: serde::Serialize>(value: &T) -> DomainResult<String> {
    serde_json::to_string(value).map_err(|e| DomainError::Storage(format!("encode error: {e}")))
}

fn split_packages(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn join_packages(packages: &[String]) -> String {
    packages.join(",")
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {e}"))
}

fn collect(models: Vec<event::Model>) -> DomainResult<Vec<Event>> {
    models.into_iter().map(model_to_domain).collect()
}

// ── EventRepository impl ────────────────────────────────────────

#[async_trait]
impl EventRepository for SeaOrmEventRepository {
    async fn insert(&self, e: Event) -> DomainResult<()> {
        debug!("Inserting event: {}", e.id);
        domain_to_model(&e)?.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Event>> {
        let model = event::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn update(&self, e: Event) -> DomainResult<()> {
        debug!("Updating event: {}", e.id);

        let existing = event::Entity::find_by_id(&e.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Event",
                field: "id",
                value: e.id.clone(),
            });
        }

        domain_to_model(&e)?.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = event::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "Event",
                field: "id",
                value: id.to_string(),
            });
        }
        Ok(())
    }

    async fn list(&self, page: u32, limit: u32) -> DomainResult<(Vec<Event>, u64)> {
        let paginator = event::Entity::find()
            .order_by_asc(event::Column::StartAt)
            .paginate(&self.db, limit.max(1) as u64);

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.max(1) as u64 - 1)
            .await
            .map_err(db_err)?;
        Ok((collect(models)?, total))
    }

    async fn find_all(&self) -> DomainResult<Vec<Event>> {
        let models = event::Entity::find()
            .order_by_asc(event::Column::StartAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        collect(models)
    }

    async fn find_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<Event>> {
        let models = event::Entity::find()
            .filter(event::Column::StartAt.gte(from))
            .filter(event::Column::StartAt.lt(to))
            .order_by_asc(event::Column::StartAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        collect(models)
    }

    async fn find_by_company_ids(&self, company_ids: &[String]) -> DomainResult<Vec<Event>> {
        if company_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = event::Entity::find()
            .filter(event::Column::CompanyGroupId.is_in(company_ids.to_vec()))
            .order_by_asc(event::Column::StartAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        collect(models)
    }

    async fn find_by_company_name_contains(&self, fragment: &str) -> DomainResult<Vec<Event>> {
        let models = event::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(event::Column::CompanyName)))
                    .like(format!("%{}%", fragment.to_lowercase())),
            )
            .order_by_asc(event::Column::StartAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        collect(models)
    }

    async fn set_payments(
        &self,
        id: &str,
        payments: &[Payment],
        deposit: i64,
        updated_by: &str,
    ) -> DomainResult<()> {
        let existing = event::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "Event",
                field: "id",
                value: id.to_string(),
            });
        };

        let mut active: event::ActiveModel = existing.into();
        active.payments = Set(encode_json(&payments.to_vec())?);
        active.deposit = Set(deposit);
        active.updated_at = Set(Utc::now());
        active.updated_by = Set(updated_by.to_string());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn set_attachments(
        &self,
        id: &str,
        attachments: &[Attachment],
        updated_by: &str,
    ) -> DomainResult<()> {
        let existing = event::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "Event",
                field: "id",
                value: id.to_string(),
            });
        };

        let mut active: event::ActiveModel = existing.into();
        active.attachments = Set(encode_json(&attachments.to_vec())?);
        active.updated_at = Set(Utc::now());
        active.updated_by = Set(updated_by.to_string());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn food_packages_roundtrip() {
        let packages = vec!["buffet".to_string(), "premium-bar".to_string()];
        assert_eq!(split_packages(&join_packages(&packages)), packages);
    }

    #[test]
    fn split_ignores_blank_segments() {
        assert_eq!(split_packages(""), Vec::<String>::new());
        assert_eq!(split_packages("buffet,, dessert "), vec!["buffet", "dessert"]);
    }
}
