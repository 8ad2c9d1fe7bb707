//! Sibling ordering.
//!
//! Within one (owner, node) group `sort_num` is a dense permutation of
//! `0..n`. Lists render by descending `sort_num`, so 0 is the bottom
//! ("tail") of the displayed order.
//!
//! Nothing here locks the sibling group: two concurrent reorders of the same
//! group can interleave their reads and writes and break density. Callers
//! that need that guarantee must serialize writers per group.

use folio_common::{AppError, AppResult};
use folio_db::entities::content;
use folio_db::repositories::{ContentRepository, SortShift};
use sea_orm::Set;

use super::collaborators::{Actor, NodeDirectoryService};
use super::publish::{apply_changes, ensure_editable, require_id};

/// Reorders content within a node and moves content between nodes.
#[derive(Clone)]
pub struct OrderingEngine {
    content_repo: ContentRepository,
    nodes: NodeDirectoryService,
}

/// Key `x` takes when placed directly after `y`.
///
/// Both keys are read before any shift. When `y` sat above `x`, closing the
/// gap left by `x` already pulled `y` down one slot, so `x` lands on `y`'s old
/// key; otherwise it lands one past it.
#[must_use]
pub const fn placement_after(x_sort: i64, y_sort: i64) -> i64 {
    if y_sort > x_sort { y_sort } else { y_sort + 1 }
}

impl OrderingEngine {
    /// Create a new ordering engine.
    #[must_use]
    pub fn new(content_repo: ContentRepository, nodes: NodeDirectoryService) -> Self {
        Self {
            content_repo,
            nodes,
        }
    }

    /// Place `x_id` directly after `y_id`, or at the tail (key 0) when `y_id` is `None`.
    pub async fn reorder(&self, actor: &Actor, x_id: &str, y_id: Option<&str>) -> AppResult<()> {
        require_id("content_id", x_id)?;
        if let Some(y_id) = y_id {
            require_id("after_id", y_id)?;
        }
        if y_id == Some(x_id) {
            return Err(AppError::Conflict(
                "Cannot place content after itself".to_string(),
            ));
        }

        let scope = actor.owner_scope();
        let txn = self.content_repo.begin().await?;
        let x = self.content_repo.get_by_id(&txn, x_id, scope).await?;
        ensure_editable(&x)?;

        let new_sort = match y_id {
            None => {
                self.content_repo
                    .shift_sort_nums(&txn, &x.user_id, &x.node_id, SortShift::Below(x.sort_num), 1)
                    .await?;
                0
            }
            Some(y_id) => {
                let y = self.content_repo.get_by_id(&txn, y_id, scope).await?;
                if y.user_id != x.user_id || y.node_id != x.node_id {
                    return Err(AppError::Conflict(format!(
                        "Content {x_id} and {y_id} are in different nodes"
                    )));
                }

                self.content_repo
                    .shift_sort_nums(&txn, &x.user_id, &x.node_id, SortShift::Above(x.sort_num), -1)
                    .await?;
                self.content_repo
                    .shift_sort_nums(&txn, &x.user_id, &x.node_id, SortShift::Above(y.sort_num), 1)
                    .await?;
                placement_after(x.sort_num, y.sort_num)
            }
        };

        let changes = content::ActiveModel {
            sort_num: Set(new_sort),
            ..Default::default()
        };
        apply_changes(&self.content_repo, &txn, &x, changes).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            content_id = x_id,
            after = ?y_id,
            from = x.sort_num,
            to = new_sort,
            "Content reordered"
        );
        Ok(())
    }

    /// Move content to another node of the same owner, appending it to the
    /// top of the target group.
    pub async fn move_to_node(
        &self,
        actor: &Actor,
        content_id: &str,
        node_id: &str,
    ) -> AppResult<content::Model> {
        require_id("content_id", content_id)?;
        require_id("node_id", node_id)?;

        let scope = actor.owner_scope();
        let before = self
            .content_repo
            .get_by_id(self.content_repo.conn(), content_id, scope)
            .await?;
        ensure_editable(&before)?;

        if before.node_id == node_id {
            return Ok(before);
        }

        let node = self
            .nodes
            .find_node(&before.user_id, node_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Node: {node_id}")))?;

        let txn = self.content_repo.begin().await?;
        // Re-read inside the transaction; the key may have moved since.
        let current = self.content_repo.get_by_id(&txn, content_id, scope).await?;
        ensure_editable(&current)?;
        if current.node_id == node.id {
            return Ok(current);
        }

        self.content_repo
            .shift_sort_nums(
                &txn,
                &current.user_id,
                &current.node_id,
                SortShift::Above(current.sort_num),
                -1,
            )
            .await?;
        let tail = self
            .content_repo
            .count_in_node(&txn, &current.user_id, &node.id)
            .await?;

        let changes = content::ActiveModel {
            node_id: Set(node.id.clone()),
            node_slug: Set(node.slug.clone()),
            sort_num: Set(tail as i64),
            ..Default::default()
        };
        let updated = apply_changes(&self.content_repo, &txn, &current, changes).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            content_id,
            from_node = %current.node_id,
            to_node = %updated.node_id,
            sort_num = updated.sort_num,
            "Content moved to node"
        );
        Ok(updated)
    }
}
