//! PostgreSQL-backed `CommentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{Comment, CommentContent, CommentId, CommentParts, TicketId, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CommentRow, CommentUpdate, NewCommentRow};
use super::pool::{DbPool, PoolError};
use super::schema::comments;

#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentRepositoryError {
    map_basic_pool_error(error, |message| CommentRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> CommentRepositoryError {
    map_basic_diesel_error(
        error,
        |message| CommentRepositoryError::query(message),
        |message| CommentRepositoryError::connection(message),
    )
}

fn row_to_comment(row: CommentRow) -> Result<Comment, CommentRepositoryError> {
    let content = CommentContent::new(&row.content).map_err(|err| {
        warn!(comment_id = %row.id, reason = %err, "stored comment row is invalid");
        CommentRepositoryError::query("stored comment has invalid content")
    })?;
    Ok(Comment::restore(CommentParts {
        id: CommentId::from_uuid(row.id),
        ticket_id: TicketId::from_uuid(row.ticket_id),
        author: UserId::from_uuid(row.author),
        content,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCommentRow {
            id: *comment.id().as_uuid(),
            ticket_id: *comment.ticket_id().as_uuid(),
            author: *comment.author().as_uuid(),
            content: comment.content().as_ref(),
            created_at: comment.created_at(),
            updated_at: comment.updated_at(),
        };
        diesel::insert_into(comments::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = comments::table
            .filter(comments::id.eq(id.as_uuid()))
            .select(CommentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_comment).transpose()
    }

    async fn update(&self, comment: &Comment) -> Result<bool, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = CommentUpdate {
            content: comment.content().as_ref(),
            updated_at: comment.updated_at(),
        };
        let updated =
            diesel::update(comments::table.filter(comments::id.eq(comment.id().as_uuid())))
                .set(&changes)
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &CommentId) -> Result<bool, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(comments::table.filter(comments::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn list_for_ticket(
        &self,
        ticket_id: &TicketId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CommentRow> = comments::table
            .filter(comments::ticket_id.eq(ticket_id.as_uuid()))
            .select(CommentRow::as_select())
            .order((comments::created_at.asc(), comments::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_comment).collect()
    }
}
