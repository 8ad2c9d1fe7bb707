//! Version history service.
//!
//! Snapshots are taken of the draft that is about to be superseded, never of
//! the value replacing it, so restoring a snapshot brings back exactly what
//! existed before the edit that captured it.

use folio_common::{AppResult, IdGenerator};
use folio_db::entities::content;
use folio_db::entities::content_history::{self, HistoryKind};
use folio_db::repositories::ContentHistoryRepository;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ConnectionTrait, Set};
use serde::Serialize;

use super::collaborators::Actor;
use super::publish::require_id;

const DEFAULT_PAGE_LIMIT: u64 = 100;

/// Response for a history snapshot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub id: String,
    pub content_id: String,
    pub title: String,
    pub body: String,
    pub kind: i32,
    pub user_id: String,
    pub node_id: String,
    pub create_time: i64,
}

impl From<content_history::Model> for HistoryResponse {
    fn from(h: content_history::Model) -> Self {
        Self {
            id: h.id,
            content_id: h.content_id,
            title: h.title,
            body: h.body,
            kind: h.kind.code(),
            user_id: h.user_id,
            node_id: h.node_id,
            create_time: h.created_at.timestamp(),
        }
    }
}

/// Appends and reads immutable content snapshots.
#[derive(Clone)]
pub struct VersionHistory {
    history_repo: ContentHistoryRepository,
    id_gen: IdGenerator,
    page_limit: u64,
}

impl VersionHistory {
    /// Create a new version history service.
    #[must_use]
    pub const fn new(history_repo: ContentHistoryRepository) -> Self {
        Self {
            history_repo,
            id_gen: IdGenerator::new(),
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Cap the number of rows a single `list` call returns.
    #[must_use]
    pub const fn with_page_limit(mut self, page_limit: u64) -> Self {
        self.page_limit = page_limit;
        self
    }

    /// Snapshot the current draft of `content` on `conn`.
    ///
    /// Must run on the same transaction as the update that supersedes the draft.
    pub async fn capture<C: ConnectionTrait>(
        &self,
        conn: &C,
        content: &content::Model,
        kind: HistoryKind,
        captured_at: DateTimeWithTimeZone,
    ) -> AppResult<content_history::Model> {
        let model = content_history::ActiveModel {
            id: Set(self.id_gen.generate()),
            content_id: Set(content.id.clone()),
            user_id: Set(content.user_id.clone()),
            node_id: Set(content.node_id.clone()),
            title: Set(content.draft_title.clone()),
            body: Set(content.draft_body.clone()),
            kind: Set(kind),
            created_at: Set(captured_at),
        };

        let snapshot = self.history_repo.create(conn, model).await?;
        tracing::debug!(
            history_id = %snapshot.id,
            content_id = %content.id,
            kind = ?kind,
            "Captured content snapshot"
        );
        Ok(snapshot)
    }

    /// Get one snapshot visible to `actor`.
    pub async fn get(&self, actor: &Actor, history_id: &str) -> AppResult<content_history::Model> {
        self.get_on(self.history_repo.conn(), actor, history_id)
            .await
    }

    /// Same as [`Self::get`], on an explicit connection or transaction.
    pub async fn get_on<C: ConnectionTrait>(
        &self,
        conn: &C,
        actor: &Actor,
        history_id: &str,
    ) -> AppResult<content_history::Model> {
        require_id("history_id", history_id)?;
        self.history_repo
            .get_by_id(conn, history_id, actor.owner_scope())
            .await
    }

    /// Snapshots of a content visible to `actor`, newest first.
    pub async fn list(
        &self,
        actor: &Actor,
        content_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<content_history::Model>> {
        require_id("content_id", content_id)?;
        self.history_repo
            .find_by_content(
                content_id,
                actor.owner_scope(),
                limit.min(self.page_limit),
                offset,
            )
            .await
    }

    /// Delete every snapshot of a content, as part of its hard deletion.
    pub async fn purge<C: ConnectionTrait>(&self, conn: &C, content_id: &str) -> AppResult<u64> {
        self.history_repo.delete_by_content(conn, content_id).await
    }

    /// Number of snapshots recorded for a content.
    pub async fn count(&self, content_id: &str) -> AppResult<u64> {
        self.history_repo
            .count_by_content(self.history_repo.conn(), content_id)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::publish::EditContentInput;
    use crate::services::test_support::{alice, harness, input};
    use chrono::Utc;
    use folio_common::config::ContentConfig;
    use folio_common::AppError;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_snapshot(id: &str, content_id: &str, kind: HistoryKind) -> content_history::Model {
        content_history::Model {
            id: id.to_string(),
            content_id: content_id.to_string(),
            user_id: "user1".to_string(),
            node_id: "n1".to_string(),
            title: "Title".to_string(),
            body: "Body".to_string(),
            kind,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_snapshot() {
        let snapshot = create_test_snapshot("h1", "c1", HistoryKind::Publish);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[snapshot.clone()]])
                .into_connection(),
        );
        let history = VersionHistory::new(ContentHistoryRepository::new(db));

        let result = history.get(&Actor::user("user1", "alice"), "h1").await.unwrap();
        assert_eq!(result.id, "h1");
        assert_eq!(result.kind, HistoryKind::Publish);
    }

    #[tokio::test]
    async fn test_get_missing_snapshot() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<content_history::Model>::new()])
                .into_connection(),
        );
        let history = VersionHistory::new(ContentHistoryRepository::new(db));

        let result = history.get(&Actor::Admin, "missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_is_capped() {
        let config = ContentConfig {
            history_page_limit: 2,
            ..ContentConfig::default()
        };
        let (service, _) = harness(&config).await;
        let actor = alice();
        let created = service.create(&actor, input("n1", "A")).await.unwrap();
        for title in ["B", "C", "D"] {
            let edit = EditContentInput {
                title: title.to_string(),
                body: String::new(),
            };
            service.workflow().edit(&actor, &created.id, edit).await.unwrap();
        }
        assert_eq!(service.history().count(&created.id).await.unwrap(), 3);

        let page = service
            .history()
            .list(&actor, &created.id, 500, 0)
            .await
            .unwrap();
        let titles: Vec<&str> = page.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, ["C", "B"]);

        let rest = service
            .history()
            .list(&actor, &created.id, 500, 2)
            .await
            .unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].title, "A");
    }

    #[tokio::test]
    async fn test_list_requires_content_id() {
        let (service, _) = harness(&ContentConfig::default()).await;

        let result = service.history().list(&alice(), "", 10, 0).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        let result = service.history().get(&alice(), "").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_history_response_codes() {
        let response = HistoryResponse::from(create_test_snapshot("h1", "c1", HistoryKind::Restore));
        assert_eq!(response.kind, 2);
        assert_eq!(response.content_id, "c1");

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("contentId").is_some());
        assert!(json.get("createTime").is_some());
    }
}
