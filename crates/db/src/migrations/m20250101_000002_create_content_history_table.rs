//! Create `content_history` table for version snapshots.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_content_table::Content;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentHistory::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ContentHistory::ContentId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentHistory::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentHistory::NodeId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentHistory::Title)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ContentHistory::Body).text().not_null())
                    .col(ColumnDef::new(ContentHistory::Kind).integer().not_null())
                    .col(
                        ColumnDef::new(ContentHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_history_content")
                            .from(ContentHistory::Table, ContentHistory::ContentId)
                            .to(Content::Table, Content::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_content_history_content_id")
                    .table(ContentHistory::Table)
                    .col(ContentHistory::ContentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_content_history_user_id")
                    .table(ContentHistory::Table)
                    .col(ContentHistory::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContentHistory::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ContentHistory {
    Table,
    Id,
    ContentId,
    UserId,
    NodeId,
    Title,
    Body,
    Kind,
    CreatedAt,
}
