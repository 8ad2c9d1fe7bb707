//! Create `content` table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Content::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Content::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Content::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Content::UserName).string_len(128).not_null())
                    .col(ColumnDef::new(Content::NodeId).string_len(32).not_null())
                    .col(ColumnDef::new(Content::NodeSlug).string_len(128).not_null())
                    .col(ColumnDef::new(Content::Slug).string_len(64))
                    .col(
                        ColumnDef::new(Content::Title)
                            .string_len(200)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Content::Body).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Content::DraftTitle)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Content::DraftBody).text().not_null())
                    .col(
                        ColumnDef::new(Content::DraftState)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Content::Status)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Content::IsTop)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Content::CommentPolicy)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Content::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Content::ImagePath).string_len(700))
                    .col(
                        ColumnDef::new(Content::Views)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Content::Password).string_len(128))
                    .col(ColumnDef::new(Content::SortNum).big_integer().not_null())
                    .col(
                        ColumnDef::new(Content::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Content::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Content::PublishedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Slugs are unique per owner; NULL means "no slug" and never collides
        manager
            .create_index(
                Index::create()
                    .name("idx_content_user_id_slug")
                    .table(Content::Table)
                    .col(Content::UserId)
                    .col(Content::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Sibling group lookups; sort_num passes through duplicates mid-shift so no unique
        manager
            .create_index(
                Index::create()
                    .name("idx_content_user_id_node_id_sort_num")
                    .table(Content::Table)
                    .col(Content::UserId)
                    .col(Content::NodeId)
                    .col(Content::SortNum)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_content_status")
                    .table(Content::Table)
                    .col(Content::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Content::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Content {
    Table,
    Id,
    UserId,
    UserName,
    NodeId,
    NodeSlug,
    Slug,
    Title,
    Body,
    DraftTitle,
    DraftBody,
    DraftState,
    Status,
    IsTop,
    CommentPolicy,
    Version,
    ImagePath,
    Views,
    Password,
    SortNum,
    CreatedAt,
    UpdatedAt,
    PublishedAt,
}
