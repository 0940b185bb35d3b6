//! Create `activity_logs` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ActivityLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ActivityLogs::Id).string_len(36).not_null().primary_key())
                    .col(ColumnDef::new(ActivityLogs::UserId).string_len(36).not_null())
                    .col(ColumnDef::new(ActivityLogs::UserEmail).string_len(320))
                    .col(ColumnDef::new(ActivityLogs::Action).string_len(64).not_null())
                    .col(ColumnDef::new(ActivityLogs::Details).json_binary())
                    .col(
                        ColumnDef::new(ActivityLogs::IpAddress)
                            .string_len(64)
                            .not_null()
                            .default("unknown"),
                    )
                    .col(ColumnDef::new(ActivityLogs::UserAgent).text())
                    .col(
                        ColumnDef::new(ActivityLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, created_at) for the per-user activity page
        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_user_id_created_at")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::UserId)
                    .col(ActivityLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_created_at")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ActivityLogs {
    Table,
    Id,
    UserId,
    UserEmail,
    Action,
    Details,
    IpAddress,
    UserAgent,
    CreatedAt,
}
