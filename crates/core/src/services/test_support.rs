//! Shared fixtures for service tests backed by an in-memory database.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use folio_common::config::ContentConfig;
use folio_db::entities::content::{self, CommentPolicy, ContentStatus};
use folio_db::repositories::{ContentHistoryRepository, ContentRepository};
use folio_db::test_utils::TestDatabase;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

use super::collaborators::{Actor, InMemoryImageCatalog, InMemoryNodeDirectory};
use super::content::{ContentService, CreateContentInput};

pub const ALICE: &str = "user1";
pub const BOB: &str = "user2";

/// Service wired to a fresh migrated database.
///
/// `user1` owns nodes `n1` (journal) and `n2` (drafts); `user2` owns `n3`.
pub async fn service() -> ContentService {
    harness(&ContentConfig::default()).await.0
}

/// Same as [`service`] with explicit limits, also returning the raw connection.
pub async fn harness(config: &ContentConfig) -> (ContentService, Arc<DatabaseConnection>) {
    let db = TestDatabase::in_memory().await.unwrap();
    let nodes = InMemoryNodeDirectory::new()
        .with_node(ALICE, "n1", "journal")
        .with_node(ALICE, "n2", "drafts")
        .with_node(BOB, "n3", "notes");
    let images = InMemoryImageCatalog::new().with_image("img/cover.png");

    let service = ContentService::new(
        ContentRepository::new(Arc::clone(&db.conn)),
        ContentHistoryRepository::new(Arc::clone(&db.conn)),
        Arc::new(nodes),
        Arc::new(images),
        config,
    );
    (service, db.connection())
}

/// Install a trigger that aborts any statement matching `event` (for example
/// `UPDATE OF sort_num ON content`), optionally only `WHEN` a condition holds.
pub async fn fail_on(conn: &DatabaseConnection, name: &str, event: &str, when: Option<&str>) {
    let when = when.map(|w| format!("WHEN {w} ")).unwrap_or_default();
    conn.execute(Statement::from_string(
        conn.get_database_backend(),
        format!(
            "CREATE TRIGGER {name} BEFORE {event} {when}BEGIN SELECT RAISE(ABORT, 'injected failure'); END"
        ),
    ))
    .await
    .unwrap();
}

pub fn alice() -> Actor {
    Actor::user(ALICE, "alice")
}

pub fn bob() -> Actor {
    Actor::user(BOB, "bob")
}

pub fn input(node_id: &str, title: &str) -> CreateContentInput {
    CreateContentInput {
        slug: None,
        title: title.to_string(),
        body: format!("{title} body"),
        node_id: node_id.to_string(),
        status: ContentStatus::Normal,
        is_top: false,
        comment_policy: CommentPolicy::Closed,
        image_path: None,
        password: None,
    }
}

/// Create contents in `node_id` in order, returning their IDs.
pub async fn seed(
    service: &ContentService,
    actor: &Actor,
    node_id: &str,
    titles: &[&str],
) -> Vec<String> {
    let mut ids = Vec::with_capacity(titles.len());
    for title in titles {
        let created = service.create(actor, input(node_id, title)).await.unwrap();
        ids.push(created.id);
    }
    ids
}

/// `(draft title, sort_num)` of a sibling group, top of the display first.
pub async fn sort_keys(service: &ContentService, actor: &Actor, node_id: &str) -> Vec<(String, i64)> {
    service
        .list_by_node(actor, node_id, 100, 0)
        .await
        .unwrap()
        .into_iter()
        .map(|c| (c.draft_title, c.sort_num))
        .collect()
}

/// Draft titles of a sibling group, top of the display first.
pub async fn display_order(service: &ContentService, actor: &Actor, node_id: &str) -> Vec<String> {
    service
        .list_by_node(actor, node_id, 100, 0)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.draft_title)
        .collect()
}

/// Assert the group's sort keys are exactly `0..n`.
pub async fn assert_dense(service: &ContentService, actor: &Actor, node_id: &str) {
    let mut keys: Vec<i64> = service
        .list_by_node(actor, node_id, 100, 0)
        .await
        .unwrap()
        .iter()
        .map(|c: &content::Model| c.sort_num)
        .collect();
    keys.sort_unstable();
    let expected: Vec<i64> = (0..keys.len() as i64).collect();
    assert_eq!(keys, expected, "sort keys of {actor:?}/{node_id} are not dense");
}
