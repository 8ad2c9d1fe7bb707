//! Content entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Moderation and visibility status of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum ContentStatus {
    #[sea_orm(num_value = 0)]
    Normal,
    #[sea_orm(num_value = 1)]
    Hidden,
    /// Locked by an administrator.
    #[sea_orm(num_value = 2)]
    Banned,
    /// In the owner's trash; the only state from which hard deletion is allowed.
    #[sea_orm(num_value = 3)]
    Trashed,
}

impl ContentStatus {
    /// Numeric code exposed to callers.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Normal => 0,
            Self::Hidden => 1,
            Self::Banned => 2,
            Self::Trashed => 3,
        }
    }

    /// Whether owner-initiated edits are locked out.
    #[must_use]
    pub const fn is_locked(self) -> bool {
        matches!(self, Self::Banned | Self::Trashed)
    }
}

impl Default for ContentStatus {
    fn default() -> Self {
        Self::Normal
    }
}

/// Who may comment on a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum CommentPolicy {
    #[sea_orm(num_value = 0)]
    Closed,
    /// Comments are accepted but held for review.
    #[sea_orm(num_value = 1)]
    OpenModerated,
    #[sea_orm(num_value = 2)]
    OpenDirect,
}

impl CommentPolicy {
    /// Numeric code exposed to callers.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Closed => 0,
            Self::OpenModerated => 1,
            Self::OpenDirect => 2,
        }
    }
}

impl Default for CommentPolicy {
    fn default() -> Self {
        Self::Closed
    }
}

/// Publish state of the draft fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum DraftState {
    /// The draft differs from the published fields; a publish is pending.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// The published fields reflect the latest draft.
    #[sea_orm(string_value = "clean")]
    Clean,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owner user ID
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Owner display name, copied at creation
    pub user_name: String,

    /// Owning node ID
    #[sea_orm(indexed)]
    pub node_id: String,

    /// Node slug, copied whenever the node assignment changes
    pub node_slug: String,

    /// Per-owner unique slug
    #[sea_orm(nullable)]
    pub slug: Option<String>,

    /// Published title
    pub title: String,

    /// Published body
    #[sea_orm(column_type = "Text")]
    pub body: String,

    pub draft_title: String,

    #[sea_orm(column_type = "Text")]
    pub draft_body: String,

    pub draft_state: DraftState,

    pub status: ContentStatus,

    #[sea_orm(default_value = false)]
    pub is_top: bool,

    pub comment_policy: CommentPolicy,

    /// Number of publish/auto-save/restore transitions
    #[sea_orm(default_value = 0)]
    pub version: i32,

    #[sea_orm(nullable)]
    pub image_path: Option<String>,

    #[sea_orm(default_value = 0)]
    pub views: i32,

    #[sea_orm(nullable)]
    pub password: Option<String>,

    /// Dense ordering key within (user_id, node_id)
    pub sort_num: i64,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub published_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Whether the draft title/body equal the given values.
    #[must_use]
    pub fn draft_matches(&self, title: &str, body: &str) -> bool {
        self.draft_title == title && self.draft_body == body
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::content_history::Entity")]
    History,
}

impl Related<super::content_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::History.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_match_stored_values() {
        for status in [
            ContentStatus::Normal,
            ContentStatus::Hidden,
            ContentStatus::Banned,
            ContentStatus::Trashed,
        ] {
            assert_eq!(status.to_value(), status.code());
        }
    }

    #[test]
    fn test_locked_statuses() {
        assert!(!ContentStatus::Normal.is_locked());
        assert!(!ContentStatus::Hidden.is_locked());
        assert!(ContentStatus::Banned.is_locked());
        assert!(ContentStatus::Trashed.is_locked());
    }

    #[test]
    fn test_comment_policy_codes() {
        assert_eq!(CommentPolicy::Closed.code(), 0);
        assert_eq!(CommentPolicy::OpenModerated.code(), 1);
        assert_eq!(CommentPolicy::OpenDirect.code(), 2);
        assert_eq!(CommentPolicy::default(), CommentPolicy::Closed);
    }
}
