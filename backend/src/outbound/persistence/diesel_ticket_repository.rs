//! PostgreSQL-backed `TicketRepository` implementation using Diesel ORM.
//!
//! Listing applies the caller's [`TicketScope`] as a `WHERE` clause so
//! invisible tickets never leave the database. Deleting a ticket relies on
//! the `comments.ticket_id` cascade.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{TicketRepository, TicketRepositoryError};
use crate::domain::{
    Priority, Ticket, TicketDescription, TicketId, TicketParts, TicketScope, TicketStatus,
    TicketTitle, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewTicketRow, TicketRow, TicketUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::tickets;

#[derive(Clone)]
pub struct DieselTicketRepository {
    pool: DbPool,
}

impl DieselTicketRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TicketRepositoryError {
    map_basic_pool_error(error, |message| TicketRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> TicketRepositoryError {
    map_basic_diesel_error(
        error,
        |message| TicketRepositoryError::query(message),
        |message| TicketRepositoryError::connection(message),
    )
}

fn row_to_ticket(row: TicketRow) -> Result<Ticket, TicketRepositoryError> {
    let corrupt = |field: &str, reason: String| {
        warn!(ticket_id = %row.id, field, %reason, "stored ticket row is invalid");
        TicketRepositoryError::query(format!("stored ticket has invalid {field}"))
    };
    let title = TicketTitle::new(&row.title).map_err(|err| corrupt("title", err.to_string()))?;
    let description = TicketDescription::new(&row.description)
        .map_err(|err| corrupt("description", err.to_string()))?;
    let priority: Priority = row
        .priority
        .parse()
        .map_err(|_| corrupt("priority", row.priority.clone()))?;
    let status: TicketStatus = row
        .status
        .parse()
        .map_err(|_| corrupt("status", row.status.clone()))?;

    Ok(Ticket::restore(TicketParts {
        id: TicketId::from_uuid(row.id),
        title,
        description,
        priority,
        status,
        created_by: UserId::from_uuid(row.created_by),
        assigned_to: row.assigned_to.map(UserId::from_uuid),
        due_date: row.due_date,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

#[async_trait]
impl TicketRepository for DieselTicketRepository {
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTicketRow {
            id: *ticket.id().as_uuid(),
            title: ticket.title().as_ref(),
            description: ticket.description().as_ref(),
            priority: ticket.priority().as_str(),
            status: ticket.status().as_str(),
            created_by: *ticket.created_by().as_uuid(),
            assigned_to: ticket.assigned_to().map(|id| *id.as_uuid()),
            due_date: ticket.due_date(),
            created_at: ticket.created_at(),
            updated_at: ticket.updated_at(),
        };
        diesel::insert_into(tickets::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &TicketId) -> Result<Option<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = tickets::table
            .filter(tickets::id.eq(id.as_uuid()))
            .select(TicketRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_ticket).transpose()
    }

    async fn update(&self, ticket: &Ticket) -> Result<bool, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = TicketUpdate {
            title: ticket.title().as_ref(),
            description: ticket.description().as_ref(),
            priority: ticket.priority().as_str(),
            status: ticket.status().as_str(),
            assigned_to: ticket.assigned_to().map(|id| *id.as_uuid()),
            due_date: ticket.due_date(),
            updated_at: ticket.updated_at(),
        };
        let updated = diesel::update(tickets::table.filter(tickets::id.eq(ticket.id().as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &TicketId) -> Result<bool, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(tickets::table.filter(tickets::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list(&self, scope: &TicketScope) -> Result<Vec<Ticket>, TicketRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = tickets::table
            .select(TicketRow::as_select())
            .order((tickets::created_at.desc(), tickets::id.desc()))
            .into_boxed();
        query = match scope {
            TicketScope::All => query,
            TicketScope::CreatedBy(user) => query.filter(tickets::created_by.eq(*user.as_uuid())),
            TicketScope::CreatedByOrAssignedTo(user) => query.filter(
                tickets::created_by
                    .eq(*user.as_uuid())
                    .or(tickets::assigned_to.eq(*user.as_uuid())),
            ),
        };
        let rows: Vec<TicketRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_ticket).collect()
    }
}
