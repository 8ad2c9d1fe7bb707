//! Content repository.

use std::sync::Arc;

use crate::entities::{content, Content};
use folio_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait,
    SqlErr, TransactionTrait,
};

/// Map a write error, reporting unique index violations (owner + slug) as `Conflict`.
fn write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            AppError::Conflict(format!("Duplicate content: {detail}"))
        }
        _ => AppError::Database(err.to_string()),
    }
}

/// Which side of a pivot key a sibling shift applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortShift {
    /// Siblings with `sort_num > pivot`.
    Above(i64),
    /// Siblings with `sort_num < pivot`.
    Below(i64),
}

/// Content repository for database operations.
///
/// Every method takes the connection to run on, so the same call works on the
/// pooled connection or inside a [`DatabaseTransaction`] from [`Self::begin`].
/// `owner` of `None` skips owner scoping (administrative access).
#[derive(Clone)]
pub struct ContentRepository {
    db: Arc<DatabaseConnection>,
}

impl ContentRepository {
    /// Create a new content repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// The pooled connection, for single-statement operations.
    #[must_use]
    pub fn conn(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// Begin a transaction. Dropping it without `commit` rolls back.
    pub async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find content by ID, optionally scoped to an owner.
    pub async fn find_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
        owner: Option<&str>,
    ) -> AppResult<Option<content::Model>> {
        Content::find_by_id(id)
            .apply_if(owner, |q, owner| q.filter(content::Column::UserId.eq(owner)))
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get content by ID, returning an error if not found.
    pub async fn get_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
        owner: Option<&str>,
    ) -> AppResult<content::Model> {
        self.find_by_id(conn, id, owner)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Content: {id}")))
    }

    /// Check if a slug is already used by one of the owner's contents.
    pub async fn slug_exists<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        slug: &str,
    ) -> AppResult<bool> {
        let count = Content::find()
            .filter(content::Column::UserId.eq(user_id))
            .filter(content::Column::Slug.eq(slug))
            .count(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Count the contents of a sibling group.
    pub async fn count_in_node<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        node_id: &str,
    ) -> AppResult<u64> {
        Content::find()
            .filter(content::Column::UserId.eq(user_id))
            .filter(content::Column::NodeId.eq(node_id))
            .count(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a sibling group in display order: pinned first, then highest `sort_num`.
    pub async fn find_by_node<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        node_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<content::Model>> {
        Content::find()
            .filter(content::Column::UserId.eq(user_id))
            .filter(content::Column::NodeId.eq(node_id))
            .order_by_desc(content::Column::IsTop)
            .order_by_desc(content::Column::SortNum)
            .order_by_desc(content::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Sibling group ordered by ascending `sort_num`.
    #[cfg(any(test, feature = "test-utils"))]
    pub async fn find_siblings<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        node_id: &str,
    ) -> AppResult<Vec<content::Model>> {
        Content::find()
            .filter(content::Column::UserId.eq(user_id))
            .filter(content::Column::NodeId.eq(node_id))
            .order_by_asc(content::Column::SortNum)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new content row.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: content::ActiveModel,
    ) -> AppResult<content::Model> {
        model.insert(conn).await.map_err(write_error)
    }

    /// Write the set columns of `changes` onto one row. Returns rows affected.
    pub async fn update_fields<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
        owner: Option<&str>,
        changes: content::ActiveModel,
    ) -> AppResult<u64> {
        let result = Content::update_many()
            .set(changes)
            .filter(content::Column::Id.eq(id))
            .apply_if(owner, |q, owner| q.filter(content::Column::UserId.eq(owner)))
            .exec(conn)
            .await
            .map_err(write_error)?;
        Ok(result.rows_affected)
    }

    /// Delete one content row. Returns rows affected.
    pub async fn delete<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
        owner: Option<&str>,
    ) -> AppResult<u64> {
        let result = Content::delete_many()
            .filter(content::Column::Id.eq(id))
            .apply_if(owner, |q, owner| q.filter(content::Column::UserId.eq(owner)))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Add `delta` to `sort_num` of every sibling on one side of a pivot.
    pub async fn shift_sort_nums<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        node_id: &str,
        shift: SortShift,
        delta: i64,
    ) -> AppResult<u64> {
        let range = match shift {
            SortShift::Above(pivot) => content::Column::SortNum.gt(pivot),
            SortShift::Below(pivot) => content::Column::SortNum.lt(pivot),
        };

        let result = Content::update_many()
            .col_expr(
                content::Column::SortNum,
                Expr::col(content::Column::SortNum).add(delta),
            )
            .filter(content::Column::UserId.eq(user_id))
            .filter(content::Column::NodeId.eq(node_id))
            .filter(range)
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::trace!(
            user_id,
            node_id,
            ?shift,
            delta,
            rows = result.rows_affected,
            "Shifted sibling sort keys"
        );
        Ok(result.rows_affected)
    }

    /// Increment the view counter. Not owner scoped.
    pub async fn increment_views<C: ConnectionTrait>(&self, conn: &C, id: &str) -> AppResult<()> {
        Content::update_many()
            .col_expr(
                content::Column::Views,
                Expr::col(content::Column::Views).add(1),
            )
            .filter(content::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
