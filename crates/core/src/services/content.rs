//! Content lifecycle service.
//!
//! Creation, field updates, status transitions and deletion of content
//! items. Draft/publish transitions are delegated to [`PublishWorkflow`]
//! and sibling ordering to [`OrderingEngine`].

use chrono::Utc;
use folio_common::config::ContentConfig;
use folio_common::{AppError, AppResult, IdGenerator};
use folio_db::entities::content::{self, CommentPolicy, ContentStatus, DraftState};
use folio_db::repositories::{ContentHistoryRepository, ContentRepository, SortShift};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::collaborators::{Actor, ImageCatalogService, NodeDirectoryService};
use super::history::VersionHistory;
use super::ordering::OrderingEngine;
use super::publish::{apply_changes, ensure_editable, require_id, PublishWorkflow};

/// Input for creating a content item.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentInput {
    /// Optional slug, unique per owner.
    #[serde(default)]
    pub slug: Option<String>,

    #[validate(length(min = 1, max = 99))]
    pub title: String,

    #[serde(default)]
    pub body: String,

    #[validate(length(min = 1))]
    pub node_id: String,

    /// Only `Normal` or `Hidden`.
    #[serde(default)]
    pub status: ContentStatus,

    #[serde(default)]
    pub is_top: bool,

    #[serde(default)]
    pub comment_policy: CommentPolicy,

    #[validate(length(max = 99))]
    #[serde(default)]
    pub image_path: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

/// Response for a content item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub id: String,
    pub slug: Option<String>,
    pub title: String,
    pub body: String,
    pub draft_title: String,
    pub draft_body: String,
    pub draft_pending: bool,
    pub user_id: String,
    pub user_name: String,
    pub node_id: String,
    pub node_slug: String,
    pub status: i32,
    pub top: bool,
    pub comment_policy: i32,
    pub version: i32,
    pub create_time: i64,
    pub update_time: i64,
    pub publish_time: i64,
    pub image_path: Option<String>,
    pub views: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub sort_num: i64,
}

impl From<content::Model> for ContentResponse {
    fn from(c: content::Model) -> Self {
        Self {
            id: c.id,
            slug: c.slug,
            title: c.title,
            body: c.body,
            draft_title: c.draft_title,
            draft_body: c.draft_body,
            draft_pending: c.draft_state == DraftState::Pending,
            user_id: c.user_id,
            user_name: c.user_name,
            node_id: c.node_id,
            node_slug: c.node_slug,
            status: c.status.code(),
            top: c.is_top,
            comment_policy: c.comment_policy.code(),
            version: c.version,
            create_time: c.created_at.timestamp(),
            update_time: c.updated_at.map_or(0, |t| t.timestamp()),
            publish_time: c.published_at.map_or(0, |t| t.timestamp()),
            image_path: c.image_path,
            views: c.views,
            password: c.password.filter(|p| !p.is_empty()),
            sort_num: c.sort_num,
        }
    }
}

/// Treat empty strings as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Slugs are 4 to 29 letters or digits.
fn check_slug(slug: &str) -> AppResult<()> {
    let len = slug.chars().count();
    if !(4..=29).contains(&len) {
        return Err(AppError::Validation(
            "Slug must be between 4 and 29 characters".to_string(),
        ));
    }
    if !slug.chars().all(char::is_alphanumeric) {
        return Err(AppError::Validation(
            "Slug must contain only letters and digits".to_string(),
        ));
    }
    Ok(())
}

/// Facade over the content lifecycle.
#[derive(Clone)]
pub struct ContentService {
    content_repo: ContentRepository,
    history: VersionHistory,
    workflow: PublishWorkflow,
    ordering: OrderingEngine,
    nodes: NodeDirectoryService,
    images: ImageCatalogService,
    id_gen: IdGenerator,
    list_limit: u64,
}

impl ContentService {
    /// Create a new content service and the services it composes.
    #[must_use]
    pub fn new(
        content_repo: ContentRepository,
        history_repo: ContentHistoryRepository,
        nodes: NodeDirectoryService,
        images: ImageCatalogService,
        config: &ContentConfig,
    ) -> Self {
        let history = VersionHistory::new(history_repo).with_page_limit(config.history_page_limit);
        let workflow = PublishWorkflow::new(content_repo.clone(), history.clone());
        let ordering = OrderingEngine::new(content_repo.clone(), nodes.clone());

        Self {
            content_repo,
            history,
            workflow,
            ordering,
            nodes,
            images,
            id_gen: IdGenerator::new(),
            list_limit: config.list_page_limit,
        }
    }

    /// Draft edit, publish and restore.
    #[must_use]
    pub const fn workflow(&self) -> &PublishWorkflow {
        &self.workflow
    }

    /// Reordering and node moves.
    #[must_use]
    pub const fn ordering(&self) -> &OrderingEngine {
        &self.ordering
    }

    /// History reads.
    #[must_use]
    pub const fn history(&self) -> &VersionHistory {
        &self.history
    }

    /// Create a content item at the top of its node's sibling group.
    pub async fn create(
        &self,
        actor: &Actor,
        input: CreateContentInput,
    ) -> AppResult<content::Model> {
        input.validate()?;
        let (user_id, user_name) = actor.require_user()?;

        if !matches!(input.status, ContentStatus::Normal | ContentStatus::Hidden) {
            return Err(AppError::Validation(
                "New content must be Normal or Hidden".to_string(),
            ));
        }

        let slug = non_empty(input.slug);
        if let Some(ref slug) = slug {
            check_slug(slug)?;
            if self
                .content_repo
                .slug_exists(self.content_repo.conn(), user_id, slug)
                .await?
            {
                return Err(AppError::Conflict(format!(
                    "Slug '{slug}' is already used"
                )));
            }
        }

        let node = self
            .nodes
            .find_node(user_id, &input.node_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Node: {}", input.node_id)))?;

        let image_path = non_empty(input.image_path);
        if let Some(ref path) = image_path {
            self.ensure_image(path).await?;
        }

        let txn = self.content_repo.begin().await?;
        let sort_num = self
            .content_repo
            .count_in_node(&txn, user_id, &node.id)
            .await?;

        let model = content::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            user_name: Set(user_name.to_string()),
            node_id: Set(node.id),
            node_slug: Set(node.slug),
            slug: Set(slug),
            title: Set(String::new()),
            body: Set(String::new()),
            draft_title: Set(input.title),
            draft_body: Set(input.body),
            draft_state: Set(DraftState::Pending),
            status: Set(input.status),
            is_top: Set(input.is_top),
            comment_policy: Set(input.comment_policy),
            version: Set(0),
            image_path: Set(image_path),
            views: Set(0),
            password: Set(non_empty(input.password)),
            sort_num: Set(sort_num as i64),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
            published_at: Set(None),
        };
        let created = self.content_repo.create(&txn, model).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            content_id = %created.id,
            user_id,
            node_id = %created.node_id,
            sort_num = created.sort_num,
            "Content created"
        );
        Ok(created)
    }

    /// Get a content item visible to `actor`.
    pub async fn get(&self, actor: &Actor, content_id: &str) -> AppResult<content::Model> {
        require_id("content_id", content_id)?;
        self.content_repo
            .get_by_id(self.content_repo.conn(), content_id, actor.owner_scope())
            .await
    }

    /// List one of the actor's sibling groups in display order.
    pub async fn list_by_node(
        &self,
        actor: &Actor,
        node_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<content::Model>> {
        let (user_id, _) = actor.require_user()?;
        self.content_repo
            .find_by_node(
                self.content_repo.conn(),
                user_id,
                node_id,
                limit.min(self.list_limit),
                offset,
            )
            .await
    }

    /// Change the slug. Unchanged input is a no-op.
    pub async fn update_slug(
        &self,
        actor: &Actor,
        content_id: &str,
        slug: &str,
    ) -> AppResult<content::Model> {
        check_slug(slug)?;
        let current = self.load_editable(actor, content_id).await?;
        if current.slug.as_deref() == Some(slug) {
            return Ok(current);
        }

        if self
            .content_repo
            .slug_exists(self.content_repo.conn(), &current.user_id, slug)
            .await?
        {
            return Err(AppError::Conflict(format!("Slug '{slug}' is already used")));
        }

        self.write(
            &current,
            content::ActiveModel {
                slug: Set(Some(slug.to_string())),
                ..Default::default()
            },
        )
        .await
    }

    /// Change the cover image. The image must exist.
    pub async fn update_image(
        &self,
        actor: &Actor,
        content_id: &str,
        image_path: &str,
    ) -> AppResult<content::Model> {
        if image_path.is_empty() || image_path.chars().count() > 99 {
            return Err(AppError::Validation(
                "Image path must be between 1 and 99 characters".to_string(),
            ));
        }
        let current = self.load_editable(actor, content_id).await?;
        if current.image_path.as_deref() == Some(image_path) {
            return Ok(current);
        }
        self.ensure_image(image_path).await?;

        self.write(
            &current,
            content::ActiveModel {
                image_path: Set(Some(image_path.to_string())),
                ..Default::default()
            },
        )
        .await
    }

    /// Owner status change between `Normal` and `Hidden`.
    pub async fn update_status(
        &self,
        actor: &Actor,
        content_id: &str,
        status: ContentStatus,
    ) -> AppResult<content::Model> {
        if !matches!(status, ContentStatus::Normal | ContentStatus::Hidden) {
            return Err(AppError::Validation(format!(
                "Status {status:?} cannot be set here"
            )));
        }
        let current = self.load_editable(actor, content_id).await?;
        if current.status == status {
            return Ok(current);
        }
        self.write(
            &current,
            content::ActiveModel {
                status: Set(status),
                ..Default::default()
            },
        )
        .await
    }

    /// Administrative status change to any status, across owners.
    pub async fn update_status_admin(
        &self,
        actor: &Actor,
        content_id: &str,
        status: ContentStatus,
    ) -> AppResult<content::Model> {
        actor.require_admin()?;
        require_id("content_id", content_id)?;
        let current = self
            .content_repo
            .get_by_id(self.content_repo.conn(), content_id, None)
            .await?;
        if current.status == status {
            return Ok(current);
        }

        let updated = self
            .write(
                &current,
                content::ActiveModel {
                    status: Set(status),
                    ..Default::default()
                },
            )
            .await?;
        tracing::info!(content_id, from = ?current.status, to = ?status, "Status changed by administrator");
        Ok(updated)
    }

    /// Pin or unpin.
    pub async fn update_top(
        &self,
        actor: &Actor,
        content_id: &str,
        top: bool,
    ) -> AppResult<content::Model> {
        let current = self.load_editable(actor, content_id).await?;
        if current.is_top == top {
            return Ok(current);
        }
        self.write(
            &current,
            content::ActiveModel {
                is_top: Set(top),
                ..Default::default()
            },
        )
        .await
    }

    /// Set or clear (empty string) the access password.
    pub async fn update_password(
        &self,
        actor: &Actor,
        content_id: &str,
        password: &str,
    ) -> AppResult<content::Model> {
        let current = self.load_editable(actor, content_id).await?;
        let password = non_empty(Some(password.to_string()));
        if current.password == password {
            return Ok(current);
        }
        self.write(
            &current,
            content::ActiveModel {
                password: Set(password),
                ..Default::default()
            },
        )
        .await
    }

    /// Count one view. Not owner scoped.
    pub async fn record_view(&self, content_id: &str) -> AppResult<()> {
        require_id("content_id", content_id)?;
        self.content_repo
            .increment_views(self.content_repo.conn(), content_id)
            .await
    }

    /// Move to trash. Already trashed content is left as is.
    pub async fn trash(&self, actor: &Actor, content_id: &str) -> AppResult<content::Model> {
        let current = self.get(actor, content_id).await?;
        if current.status == ContentStatus::Trashed {
            return Ok(current);
        }

        let updated = self
            .write(
                &current,
                content::ActiveModel {
                    status: Set(ContentStatus::Trashed),
                    ..Default::default()
                },
            )
            .await?;
        tracing::info!(content_id, from = ?current.status, "Content moved to trash");
        Ok(updated)
    }

    /// Take out of trash back to `Normal`. Content not in the trash is left as is.
    pub async fn restore_from_trash(
        &self,
        actor: &Actor,
        content_id: &str,
    ) -> AppResult<content::Model> {
        let current = self.get(actor, content_id).await?;
        if current.status != ContentStatus::Trashed {
            return Ok(current);
        }

        let updated = self
            .write(
                &current,
                content::ActiveModel {
                    status: Set(ContentStatus::Normal),
                    ..Default::default()
                },
            )
            .await?;
        tracing::info!(content_id, "Content restored from trash");
        Ok(updated)
    }

    /// Permanently delete trashed content and its history, closing the gap
    /// it leaves in its sibling group.
    pub async fn hard_delete(&self, actor: &Actor, content_id: &str) -> AppResult<()> {
        require_id("content_id", content_id)?;
        let txn = self.content_repo.begin().await?;
        let current = self
            .content_repo
            .get_by_id(&txn, content_id, actor.owner_scope())
            .await?;
        if current.status != ContentStatus::Trashed {
            return Err(AppError::InvalidState(format!(
                "Content {content_id} must be in the trash before deletion"
            )));
        }

        let snapshots = self.history.purge(&txn, &current.id).await?;
        let rows = self
            .content_repo
            .delete(&txn, &current.id, Some(&current.user_id))
            .await?;
        if rows == 0 {
            return Err(AppError::NotFound(format!("Content: {content_id}")));
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

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(content_id, snapshots, "Content permanently deleted");
        Ok(())
    }

    async fn load_editable(&self, actor: &Actor, content_id: &str) -> AppResult<content::Model> {
        let current = self.get(actor, content_id).await?;
        ensure_editable(&current)?;
        Ok(current)
    }

    async fn write(
        &self,
        current: &content::Model,
        changes: content::ActiveModel,
    ) -> AppResult<content::Model> {
        apply_changes(&self.content_repo, self.content_repo.conn(), current, changes).await
    }

    async fn ensure_image(&self, path: &str) -> AppResult<()> {
        if self.images.exists(path).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Image: {path}")))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::test_support::{
        alice, assert_dense, bob, display_order, fail_on, harness, input, service, sort_keys,
    };

    #[test]
    fn test_check_slug() {
        assert!(check_slug("post1").is_ok());
        assert!(check_slug("日本語の記事").is_ok());
        assert!(check_slug("abc").is_err());
        assert!(check_slug(&"a".repeat(30)).is_err());
        assert!(check_slug("has-dash").is_err());
    }

    #[tokio::test]
    async fn test_create_appends_to_top() {
        let service = service().await;
        let actor = alice();

        let first = service.create(&actor, input("n1", "First")).await.unwrap();
        let second = service.create(&actor, input("n1", "Second")).await.unwrap();
        let other_node = service.create(&actor, input("n2", "Other")).await.unwrap();

        assert_eq!(first.sort_num, 0);
        assert_eq!(second.sort_num, 1);
        assert_eq!(other_node.sort_num, 0);
        assert_eq!(first.node_slug, "journal");
        assert_eq!(first.user_name, "alice");
        assert_eq!(display_order(&service, &actor, "n1").await, ["Second", "First"]);
    }

    #[tokio::test]
    async fn test_create_requires_user() {
        let service = service().await;

        let result = service.create(&Actor::Admin, input("n1", "First")).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_unknown_node() {
        let service = service().await;

        let result = service.create(&alice(), input("n3", "First")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_admin_statuses() {
        let service = service().await;
        let mut banned = input("n1", "First");
        banned.status = ContentStatus::Banned;

        let result = service.create(&alice(), banned).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_checks_image() {
        let service = service().await;
        let mut missing = input("n1", "First");
        missing.image_path = Some("img/missing.png".to_string());
        let mut known = input("n1", "Second");
        known.image_path = Some("img/cover.png".to_string());

        let result = service.create(&alice(), missing).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let created = service.create(&alice(), known).await.unwrap();
        assert_eq!(created.image_path.as_deref(), Some("img/cover.png"));
    }

    #[tokio::test]
    async fn test_slug_unique_per_owner() {
        let service = service().await;
        let mut first = input("n1", "First");
        first.slug = Some("hello".to_string());
        let mut duplicate = input("n2", "Second");
        duplicate.slug = Some("hello".to_string());
        let mut other_owner = input("n3", "Third");
        other_owner.slug = Some("hello".to_string());

        service.create(&alice(), first).await.unwrap();

        let result = service.create(&alice(), duplicate).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        let created = service.create(&bob(), other_owner).await.unwrap();
        assert_eq!(created.slug.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_empty_slug_is_absent() {
        let service = service().await;
        let mut first = input("n1", "First");
        first.slug = Some(String::new());
        let mut second = input("n1", "Second");
        second.slug = Some(String::new());

        let a = service.create(&alice(), first).await.unwrap();
        let b = service.create(&alice(), second).await.unwrap();
        assert!(a.slug.is_none());
        assert!(b.slug.is_none());
    }

    #[tokio::test]
    async fn test_update_slug() {
        let service = service().await;
        let actor = alice();
        let mut taken = input("n1", "Taken");
        taken.slug = Some("taken".to_string());
        service.create(&actor, taken).await.unwrap();
        let created = service.create(&actor, input("n1", "First")).await.unwrap();

        let updated = service.update_slug(&actor, &created.id, "fresh").await.unwrap();
        assert_eq!(updated.slug.as_deref(), Some("fresh"));

        let same = service.update_slug(&actor, &created.id, "fresh").await.unwrap();
        assert_eq!(same.slug.as_deref(), Some("fresh"));

        let result = service.update_slug(&actor, &created.id, "taken").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_image() {
        let service = service().await;
        let actor = alice();
        let created = service.create(&actor, input("n1", "First")).await.unwrap();

        let result = service.update_image(&actor, &created.id, "img/none.png").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let updated = service
            .update_image(&actor, &created.id, "img/cover.png")
            .await
            .unwrap();
        assert_eq!(updated.image_path.as_deref(), Some("img/cover.png"));
    }

    #[tokio::test]
    async fn test_update_status_owner_limits() {
        let service = service().await;
        let actor = alice();
        let created = service.create(&actor, input("n1", "First")).await.unwrap();

        let hidden = service
            .update_status(&actor, &created.id, ContentStatus::Hidden)
            .await
            .unwrap();
        assert_eq!(hidden.status, ContentStatus::Hidden);

        let result = service
            .update_status(&actor, &created.id, ContentStatus::Banned)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_admin_status_changes() {
        let service = service().await;
        let actor = alice();
        let created = service.create(&actor, input("n1", "First")).await.unwrap();

        let result = service
            .update_status_admin(&actor, &created.id, ContentStatus::Banned)
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));

        let banned = service
            .update_status_admin(&Actor::Admin, &created.id, ContentStatus::Banned)
            .await
            .unwrap();
        assert_eq!(banned.status, ContentStatus::Banned);

        // Owners cannot lift a ban themselves.
        let result = service
            .update_status(&actor, &created.id, ContentStatus::Normal)
            .await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
        let result = service.update_top(&actor, &created.id, true).await;
        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_update_top_and_password() {
        let service = service().await;
        let actor = alice();
        let first = service.create(&actor, input("n1", "First")).await.unwrap();
        service.create(&actor, input("n1", "Second")).await.unwrap();

        service.update_top(&actor, &first.id, true).await.unwrap();
        assert_eq!(display_order(&service, &actor, "n1").await, ["First", "Second"]);

        let locked = service
            .update_password(&actor, &first.id, "secret")
            .await
            .unwrap();
        assert_eq!(locked.password.as_deref(), Some("secret"));

        let cleared = service.update_password(&actor, &first.id, "").await.unwrap();
        assert!(cleared.password.is_none());
    }

    #[tokio::test]
    async fn test_record_view() {
        let service = service().await;
        let created = service.create(&alice(), input("n1", "First")).await.unwrap();

        service.record_view(&created.id).await.unwrap();
        service.record_view(&created.id).await.unwrap();

        let current = service.get(&alice(), &created.id).await.unwrap();
        assert_eq!(current.views, 2);
    }

    #[tokio::test]
    async fn test_trash_and_restore_are_idempotent() {
        let service = service().await;
        let actor = alice();
        let created = service.create(&actor, input("n1", "First")).await.unwrap();

        let trashed = service.trash(&actor, &created.id).await.unwrap();
        assert_eq!(trashed.status, ContentStatus::Trashed);
        assert_eq!(trashed.sort_num, created.sort_num);
        let again = service.trash(&actor, &created.id).await.unwrap();
        assert_eq!(again.status, ContentStatus::Trashed);

        let restored = service.restore_from_trash(&actor, &created.id).await.unwrap();
        assert_eq!(restored.status, ContentStatus::Normal);
        let again = service.restore_from_trash(&actor, &created.id).await.unwrap();
        assert_eq!(again.status, ContentStatus::Normal);
    }

    #[tokio::test]
    async fn test_hard_delete_requires_trash() {
        let service = service().await;
        let actor = alice();
        let created = service.create(&actor, input("n1", "First")).await.unwrap();

        for status in [ContentStatus::Normal, ContentStatus::Hidden, ContentStatus::Banned] {
            service
                .update_status_admin(&Actor::Admin, &created.id, status)
                .await
                .unwrap();
            let result = service.hard_delete(&actor, &created.id).await;
            assert!(matches!(result, Err(AppError::InvalidState(_))));
        }
    }

    #[tokio::test]
    async fn test_hard_delete_removes_content_and_history() {
        let service = service().await;
        let actor = alice();
        let ids: Vec<String> = {
            let mut ids = Vec::new();
            for title in ["A", "B", "C"] {
                ids.push(service.create(&actor, input("n1", title)).await.unwrap().id);
            }
            ids
        };
        service.workflow().publish(&actor, &ids[1]).await.unwrap();
        let snapshot = service
            .history()
            .list(&actor, &ids[1], 10, 0)
            .await
            .unwrap()
            .remove(0);

        service.trash(&actor, &ids[1]).await.unwrap();
        service.hard_delete(&actor, &ids[1]).await.unwrap();

        assert!(matches!(
            service.get(&actor, &ids[1]).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.history().get(&actor, &snapshot.id).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(service.history().count(&ids[1]).await.unwrap(), 0);
        assert_eq!(display_order(&service, &actor, "n1").await, ["C", "A"]);
        assert_dense(&service, &actor, "n1").await;
    }

    #[tokio::test]
    async fn test_content_response_shape() {
        let service = service().await;
        let actor = alice();
        let created = service.create(&actor, input("n1", "First")).await.unwrap();

        let response = ContentResponse::from(created);
        assert!(response.draft_pending);
        assert_eq!(response.status, 0);
        assert_eq!(response.update_time, 0);
        assert_eq!(response.publish_time, 0);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["draftTitle"], "First");
        assert_eq!(json["nodeSlug"], "journal");
        assert!(json.get("password").is_none());
    }

    #[tokio::test]
    async fn test_empty_ids_are_validation_errors() {
        let service = service().await;
        let actor = alice();

        assert!(matches!(
            service.get(&actor, "").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.trash(&actor, "").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.restore_from_trash(&actor, "").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.hard_delete(&actor, "").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.update_top(&actor, "", true).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.record_view("").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service
                .update_status_admin(&Actor::Admin, "", ContentStatus::Banned)
                .await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_title_and_image_length_limits() {
        let service = service().await;
        let actor = alice();

        let longest = service
            .create(&actor, input("n1", &"t".repeat(99)))
            .await
            .unwrap();
        let result = service.create(&actor, input("n1", &"t".repeat(100))).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = service
            .update_image(&actor, &longest.id, &"i".repeat(100))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_failed_hard_delete_rolls_back() {
        let (service, conn) = harness(&ContentConfig::default()).await;
        let actor = alice();
        let mut ids = Vec::new();
        for title in ["A", "B", "C"] {
            ids.push(service.create(&actor, input("n1", title)).await.unwrap().id);
        }
        service.workflow().publish(&actor, &ids[1]).await.unwrap();
        service.trash(&actor, &ids[1]).await.unwrap();
        // History and row deletes succeed; closing the gap fails.
        fail_on(&conn, "fail_shift", "UPDATE OF sort_num ON content", None).await;

        let result = service.hard_delete(&actor, &ids[1]).await;
        assert!(matches!(result, Err(AppError::Database(_))));

        let kept = service.get(&actor, &ids[1]).await.unwrap();
        assert_eq!(kept.status, ContentStatus::Trashed);
        assert_eq!(service.history().count(&ids[1]).await.unwrap(), 1);
        assert_eq!(
            sort_keys(&service, &actor, "n1").await,
            [("C".to_string(), 2), ("B".to_string(), 1), ("A".to_string(), 0)]
        );
    }
}
