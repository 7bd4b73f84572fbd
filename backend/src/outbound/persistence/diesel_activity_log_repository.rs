//! Append-only PostgreSQL activity log.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{ActivityLogRepository, ActivityLogRepositoryError};
use crate::domain::{
    ActivityAction, ActivityId, ActivityLogEntry, ActivityRecord, LogOrder, TicketId, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ActivityLogRow, NewActivityLogRow};
use super::pool::{DbPool, PoolError};
use super::schema::activity_logs;

#[derive(Clone)]
pub struct DieselActivityLogRepository {
    pool: DbPool,
}

impl DieselActivityLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ActivityLogRepositoryError {
    map_basic_pool_error(error, |message| {
        ActivityLogRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> ActivityLogRepositoryError {
    map_basic_diesel_error(
        error,
        |message| ActivityLogRepositoryError::query(message),
        |message| ActivityLogRepositoryError::connection(message),
    )
}

fn row_to_entry(row: ActivityLogRow) -> Result<ActivityLogEntry, ActivityLogRepositoryError> {
    let action: ActivityAction = row.action.parse().map_err(|_| {
        warn!(activity_id = %row.id, action = %row.action, "stored activity action is unknown");
        ActivityLogRepositoryError::query("stored activity has invalid action")
    })?;
    let record = ActivityRecord {
        ticket_id: row.ticket_id.map(TicketId::from_uuid),
        action,
        performed_by: UserId::from_uuid(row.performed_by),
        metadata: row.metadata,
    };
    Ok(ActivityLogEntry::new(
        ActivityId::from_uuid(row.id),
        record,
        row.created_at,
    ))
}

#[async_trait]
impl ActivityLogRepository for DieselActivityLogRepository {
    async fn append(&self, entry: &ActivityLogEntry) -> Result<(), ActivityLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewActivityLogRow {
            id: *entry.id().as_uuid(),
            ticket_id: entry.ticket_id().map(|id| *id.as_uuid()),
            action: entry.action().as_str(),
            performed_by: *entry.performed_by().as_uuid(),
            metadata: entry.metadata(),
            created_at: entry.created_at(),
        };
        diesel::insert_into(activity_logs::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_ticket(
        &self,
        ticket_id: &TicketId,
        order: LogOrder,
    ) -> Result<Vec<ActivityLogEntry>, ActivityLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = activity_logs::table
            .filter(activity_logs::ticket_id.eq(ticket_id.as_uuid()))
            .select(ActivityLogRow::as_select())
            .into_boxed();
        let query = match order {
            LogOrder::NewestFirst => {
                query.order((activity_logs::created_at.desc(), activity_logs::id.desc()))
            }
            LogOrder::OldestFirst => {
                query.order((activity_logs::created_at.asc(), activity_logs::id.asc()))
            }
        };
        let rows: Vec<ActivityLogRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_entry).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::json;
    use uuid::Uuid;

    fn row(action: &str) -> ActivityLogRow {
        ActivityLogRow {
            id: Uuid::from_u128(0x30),
            ticket_id: Some(Uuid::from_u128(0x10)),
            action: action.to_owned(),
            performed_by: Uuid::from_u128(2),
            metadata: json!({ "from": "open", "to": "reopened" }),
            created_at: Utc
                .with_ymd_and_hms(2025, 2, 3, 4, 5, 6)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[rstest]
    fn known_action_restores_entry() {
        let entry = row_to_entry(row("reopened")).expect("valid row");

        assert_eq!(entry.action(), ActivityAction::Reopened);
        assert_eq!(entry.metadata()["to"], "reopened");
    }

    #[rstest]
    fn unknown_action_is_a_query_error() {
        let err = row_to_entry(row("teleported")).expect_err("corrupt row");

        assert_eq!(
            err,
            ActivityLogRepositoryError::query("stored activity has invalid action")
        );
    }
}
