//! Create `administrative_divisions` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdministrativeDivisions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdministrativeDivisions::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdministrativeDivisions::ParentId).string_len(36))
                    .col(ColumnDef::new(AdministrativeDivisions::NameFr).string_len(256).not_null())
                    .col(ColumnDef::new(AdministrativeDivisions::NameAr).string_len(256).not_null())
                    .col(ColumnDef::new(AdministrativeDivisions::Code).string_len(32))
                    .col(
                        ColumnDef::new(AdministrativeDivisions::DivisionType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AdministrativeDivisions::GpsCoordinates).string_len(64))
                    .col(
                        ColumnDef::new(AdministrativeDivisions::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AdministrativeDivisions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(AdministrativeDivisions::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_administrative_divisions_parent")
                            .from(AdministrativeDivisions::Table, AdministrativeDivisions::ParentId)
                            .to(AdministrativeDivisions::Table, AdministrativeDivisions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: parent_id (children lookups)
        manager
            .create_index(
                Index::create()
                    .name("idx_administrative_divisions_parent_id")
                    .table(AdministrativeDivisions::Table)
                    .col(AdministrativeDivisions::ParentId)
                    .to_owned(),
            )
            .await?;

        // Index: division_type
        manager
            .create_index(
                Index::create()
                    .name("idx_administrative_divisions_type")
                    .table(AdministrativeDivisions::Table)
                    .col(AdministrativeDivisions::DivisionType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdministrativeDivisions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AdministrativeDivisions {
    Table,
    Id,
    ParentId,
    NameFr,
    NameAr,
    Code,
    DivisionType,
    GpsCoordinates,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
