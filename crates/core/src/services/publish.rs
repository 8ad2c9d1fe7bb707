//! Draft/publish workflow.
//!
//! A content item is either draft-pending (the draft differs from what was
//! last published) or clean. Edits and restores only ever touch the draft
//! fields; publishing copies the draft over the published fields.

use chrono::Utc;
use folio_common::{AppError, AppResult};
use folio_db::entities::content::{self, DraftState};
use folio_db::entities::content_history::HistoryKind;
use folio_db::repositories::ContentRepository;
use sea_orm::{ConnectionTrait, Set};
use serde::Deserialize;
use validator::Validate;

use super::collaborators::Actor;
use super::history::VersionHistory;

/// Input for editing the draft of a content item.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditContentInput {
    #[validate(length(min = 1, max = 99))]
    pub title: String,

    #[serde(default)]
    pub body: String,
}

/// `Validation` when a required identifier is empty.
pub(crate) fn require_id(field: &str, value: &str) -> AppResult<()> {
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Reject edits to banned or trashed content.
pub(crate) fn ensure_editable(content: &content::Model) -> AppResult<()> {
    if content.status.is_locked() {
        tracing::warn!(
            content_id = %content.id,
            status = ?content.status,
            "Rejected change to locked content"
        );
        return Err(AppError::InvalidState(format!(
            "Content {} is {:?} and cannot be modified",
            content.id, content.status
        )));
    }
    Ok(())
}

/// Write `changes` to one row inside `conn` and read the row back.
pub(crate) async fn apply_changes<C: ConnectionTrait>(
    repo: &ContentRepository,
    conn: &C,
    content: &content::Model,
    changes: content::ActiveModel,
) -> AppResult<content::Model> {
    let rows = repo
        .update_fields(conn, &content.id, Some(&content.user_id), changes)
        .await?;
    if rows == 0 {
        return Err(AppError::NotFound(format!("Content: {}", content.id)));
    }
    repo.get_by_id(conn, &content.id, None).await
}

/// State machine over the draft and published fields.
#[derive(Clone)]
pub struct PublishWorkflow {
    content_repo: ContentRepository,
    history: VersionHistory,
}

impl PublishWorkflow {
    /// Create a new publish workflow.
    #[must_use]
    pub const fn new(content_repo: ContentRepository, history: VersionHistory) -> Self {
        Self {
            content_repo,
            history,
        }
    }

    /// Replace the draft title and body.
    ///
    /// The previous draft is captured as an auto-save snapshot. Identical
    /// input is a no-op.
    pub async fn edit(
        &self,
        actor: &Actor,
        content_id: &str,
        input: EditContentInput,
    ) -> AppResult<content::Model> {
        require_id("content_id", content_id)?;
        input.validate()?;

        let txn = self.content_repo.begin().await?;
        let current = self
            .content_repo
            .get_by_id(&txn, content_id, actor.owner_scope())
            .await?;
        ensure_editable(&current)?;

        if current.draft_matches(&input.title, &input.body) {
            tracing::debug!(content_id, "Draft unchanged, skipping edit");
            return Ok(current);
        }

        let now = Utc::now().into();
        self.history
            .capture(&txn, &current, HistoryKind::AutoSave, now)
            .await?;

        let changes = content::ActiveModel {
            draft_title: Set(input.title),
            draft_body: Set(input.body),
            draft_state: Set(DraftState::Pending),
            version: Set(current.version + 1),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        let updated = apply_changes(&self.content_repo, &txn, &current, changes).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(content_id, version = updated.version, "Draft saved");
        Ok(updated)
    }

    /// Make the current draft live.
    ///
    /// Publishing clean content is a no-op.
    pub async fn publish(&self, actor: &Actor, content_id: &str) -> AppResult<content::Model> {
        require_id("content_id", content_id)?;
        let txn = self.content_repo.begin().await?;
        let current = self
            .content_repo
            .get_by_id(&txn, content_id, actor.owner_scope())
            .await?;
        ensure_editable(&current)?;

        if current.draft_state == DraftState::Clean {
            tracing::debug!(content_id, "Content already published, skipping");
            return Ok(current);
        }

        let now = Utc::now().into();
        self.history
            .capture(&txn, &current, HistoryKind::Publish, now)
            .await?;

        let changes = content::ActiveModel {
            title: Set(current.draft_title.clone()),
            body: Set(current.draft_body.clone()),
            draft_state: Set(DraftState::Clean),
            version: Set(current.version + 1),
            updated_at: Set(Some(now)),
            published_at: Set(Some(now)),
            ..Default::default()
        };
        let updated = apply_changes(&self.content_repo, &txn, &current, changes).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(content_id, version = updated.version, "Content published");
        Ok(updated)
    }

    /// Reset the draft to a history snapshot.
    ///
    /// The draft being replaced is captured as a restore snapshot. Published
    /// fields are untouched; the content stays draft-pending until published.
    pub async fn restore(&self, actor: &Actor, history_id: &str) -> AppResult<content::Model> {
        require_id("history_id", history_id)?;
        let txn = self.content_repo.begin().await?;
        let snapshot = self.history.get_on(&txn, actor, history_id).await?;
        let current = self
            .content_repo
            .get_by_id(&txn, &snapshot.content_id, actor.owner_scope())
            .await?;
        ensure_editable(&current)?;

        if current.draft_matches(&snapshot.title, &snapshot.body) {
            tracing::debug!(
                content_id = %current.id,
                history_id,
                "Draft already matches snapshot, skipping restore"
            );
            return Ok(current);
        }

        let now = Utc::now().into();
        self.history
            .capture(&txn, &current, HistoryKind::Restore, now)
            .await?;

        let changes = content::ActiveModel {
            draft_title: Set(snapshot.title),
            draft_body: Set(snapshot.body),
            draft_state: Set(DraftState::Pending),
            version: Set(current.version + 1),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        let updated = apply_changes(&self.content_repo, &txn, &current, changes).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            content_id = %updated.id,
            history_id,
            version = updated.version,
            "Draft restored from history"
        );
        Ok(updated)
    }
}
