//! Content history entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transition that caused a snapshot to be captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum HistoryKind {
    #[sea_orm(num_value = 0)]
    AutoSave,
    #[sea_orm(num_value = 1)]
    Publish,
    #[sea_orm(num_value = 2)]
    Restore,
}

impl HistoryKind {
    /// Numeric code exposed to callers.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::AutoSave => 0,
            Self::Publish => 1,
            Self::Restore => 2,
        }
    }
}

/// Immutable snapshot of a draft taken just before it was superseded.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub content_id: String,

    #[sea_orm(indexed)]
    pub user_id: String,

    /// Node the content belonged to at capture time
    pub node_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub body: String,

    pub kind: HistoryKind,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::content::Entity",
        from = "Column::ContentId",
        to = "super::content::Column::Id",
        on_delete = "Cascade"
    )]
    Content,
}

impl Related<super::content::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Content.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
