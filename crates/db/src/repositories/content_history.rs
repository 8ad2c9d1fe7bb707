//! Content history repository.

use std::sync::Arc;

use crate::entities::{content_history, ContentHistory};
use folio_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait,
};

/// Content history repository. Rows are append-only.
#[derive(Clone)]
pub struct ContentHistoryRepository {
    db: Arc<DatabaseConnection>,
}

impl ContentHistoryRepository {
    /// Create a new content history repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// The pooled connection, for reads outside a transaction.
    #[must_use]
    pub fn conn(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// Insert a snapshot.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: content_history::ActiveModel,
    ) -> AppResult<content_history::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a snapshot by ID, optionally scoped to an owner.
    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
        owner: Option<&str>,
    ) -> AppResult<Option<content_history::Model>> {
        ContentHistory::find_by_id(id)
            .apply_if(owner, |q, owner| {
                q.filter(content_history::Column::UserId.eq(owner))
            })
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a snapshot by ID, returning an error if not found.
    pub async fn get_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
        owner: Option<&str>,
    ) -> AppResult<content_history::Model> {
        self.find_by_id(conn, id, owner)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Content history: {id}")))
    }

    /// Snapshots of one content, newest first.
    pub async fn find_by_content(
        &self,
        content_id: &str,
        owner: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<content_history::Model>> {
        ContentHistory::find()
            .filter(content_history::Column::ContentId.eq(content_id))
            .apply_if(owner, |q, owner| {
                q.filter(content_history::Column::UserId.eq(owner))
            })
            .order_by_desc(content_history::Column::CreatedAt)
            .order_by_desc(content_history::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count snapshots of one content.
    pub async fn count_by_content<C: ConnectionTrait>(
        &self,
        conn: &C,
        content_id: &str,
    ) -> AppResult<u64> {
        ContentHistory::find()
            .filter(content_history::Column::ContentId.eq(content_id))
            .count(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete every snapshot of one content. Only used by hard deletion.
    pub async fn delete_by_content<C: ConnectionTrait>(
        &self,
        conn: &C,
        content_id: &str,
    ) -> AppResult<u64> {
        let result = ContentHistory::delete_many()
            .filter(content_history::Column::ContentId.eq(content_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
