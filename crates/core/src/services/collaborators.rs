//! Contracts the engine needs from the rest of the system.
//!
//! Identity, node lookup and image lookup live outside this crate; callers
//! hand the services an [`Actor`] and implementations of [`NodeDirectory`]
//! and [`ImageCatalog`].

use async_trait::async_trait;
use folio_common::{AppError, AppResult};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

/// The identity an operation runs as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// An authenticated owner. Every lookup is scoped to their rows.
    User { id: String, name: String },
    /// Administrative override that bypasses owner scoping.
    Admin,
}

impl Actor {
    /// Create a user actor.
    pub fn user(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::User {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Owner filter for repository lookups; `None` for administrators.
    #[must_use]
    pub fn owner_scope(&self) -> Option<&str> {
        match self {
            Self::User { id, .. } => Some(id.as_str()),
            Self::Admin => None,
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// The user's `(id, name)`, or `Forbidden` for administrators.
    pub fn require_user(&self) -> AppResult<(&str, &str)> {
        match self {
            Self::User { id, name } => Ok((id.as_str(), name.as_str())),
            Self::Admin => Err(AppError::Forbidden(
                "This operation requires a user identity".to_string(),
            )),
        }
    }

    /// `Forbidden` unless this is an administrator.
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Administrator privileges required".to_string(),
            ))
        }
    }
}

/// A node as seen by the content engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    pub id: String,
    pub slug: String,
}

/// Resolves node IDs belonging to an owner.
#[async_trait]
pub trait NodeDirectory: Send + Sync {
    /// Find the node with `node_id` owned by `user_id`.
    async fn find_node(&self, user_id: &str, node_id: &str) -> AppResult<Option<NodeRef>>;
}

/// Checks that an image reference points at a usable resource.
#[async_trait]
pub trait ImageCatalog: Send + Sync {
    async fn exists(&self, path: &str) -> AppResult<bool>;
}

pub type NodeDirectoryService = Arc<dyn NodeDirectory>;
pub type ImageCatalogService = Arc<dyn ImageCatalog>;

/// Node directory backed by a map, for embedding and tests.
#[derive(Debug, Default)]
pub struct InMemoryNodeDirectory {
    nodes: RwLock<HashMap<(String, String), String>>,
}

impl InMemoryNodeDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node for an owner.
    #[must_use]
    pub fn with_node(self, user_id: &str, node_id: &str, slug: &str) -> Self {
        self.insert(user_id, node_id, slug);
        self
    }

    pub fn insert(&self, user_id: &str, node_id: &str, slug: &str) {
        self.nodes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((user_id.to_string(), node_id.to_string()), slug.to_string());
    }
}

#[async_trait]
impl NodeDirectory for InMemoryNodeDirectory {
    async fn find_node(&self, user_id: &str, node_id: &str) -> AppResult<Option<NodeRef>> {
        let nodes = self.nodes.read().unwrap_or_else(PoisonError::into_inner);
        Ok(nodes
            .get(&(user_id.to_string(), node_id.to_string()))
            .map(|slug| NodeRef {
                id: node_id.to_string(),
                slug: slug.clone(),
            }))
    }
}

/// Image catalog backed by a set of known paths.
#[derive(Debug, Default)]
pub struct InMemoryImageCatalog {
    paths: RwLock<HashSet<String>>,
}

impl InMemoryImageCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_image(self, path: &str) -> Self {
        self.insert(path);
        self
    }

    pub fn insert(&self, path: &str) {
        self.paths
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string());
    }
}

#[async_trait]
impl ImageCatalog for InMemoryImageCatalog {
    async fn exists(&self, path: &str) -> AppResult<bool> {
        let paths = self.paths.read().unwrap_or_else(PoisonError::into_inner);
        Ok(paths.contains(path))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_scope() {
        assert_eq!(Actor::user("u1", "alice").owner_scope(), Some("u1"));
        assert_eq!(Actor::Admin.owner_scope(), None);
    }

    #[test]
    fn test_require_user_rejects_admin() {
        assert!(matches!(
            Actor::Admin.require_user(),
            Err(AppError::Forbidden(_))
        ));
        assert_eq!(
            Actor::user("u1", "alice").require_user().unwrap(),
            ("u1", "alice")
        );
    }

    #[test]
    fn test_require_admin() {
        assert!(Actor::Admin.require_admin().is_ok());
        assert!(Actor::user("u1", "alice").require_admin().is_err());
    }

    #[tokio::test]
    async fn test_node_directory_is_owner_scoped() {
        let nodes = InMemoryNodeDirectory::new().with_node("u1", "n1", "journal");

        let found = nodes.find_node("u1", "n1").await.unwrap().unwrap();
        assert_eq!(found.slug, "journal");
        assert!(nodes.find_node("u2", "n1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_image_catalog() {
        let images = InMemoryImageCatalog::new().with_image("/img/a.png");
        assert!(images.exists("/img/a.png").await.unwrap());
        assert!(!images.exists("/img/b.png").await.unwrap());
    }

    #[tokio::test]
    #[allow(clippy::panic)]
    async fn test_poisoned_lock_still_accepts_writes() {
        let nodes = InMemoryNodeDirectory::new();
        let images = InMemoryImageCatalog::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _nodes = nodes.nodes.write().unwrap();
            let _paths = images.paths.write().unwrap();
            panic!("writer failed while holding the locks");
        }));
        assert!(nodes.nodes.is_poisoned());
        assert!(images.paths.is_poisoned());

        nodes.insert("u1", "n1", "journal");
        images.insert("img/cover.png");

        assert!(nodes.find_node("u1", "n1").await.unwrap().is_some());
        assert!(images.exists("img/cover.png").await.unwrap());
    }
}
