//! Create `licenses` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Licenses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Licenses::Id).string_len(36).not_null().primary_key())
                    .col(ColumnDef::new(Licenses::FacilityId).string_len(36).not_null())
                    .col(ColumnDef::new(Licenses::LicenseNumber).string_len(128).not_null())
                    .col(ColumnDef::new(Licenses::LicenseType).string_len(128).not_null())
                    .col(ColumnDef::new(Licenses::IssuingAuthority).string_len(256).not_null())
                    .col(ColumnDef::new(Licenses::IssueDate).date().not_null())
                    .col(ColumnDef::new(Licenses::ExpiryDate).date().not_null())
                    .col(
                        ColumnDef::new(Licenses::Status)
                            .string_len(16)
                            .not_null()
                            .default("valid"),
                    )
                    .col(ColumnDef::new(Licenses::DocumentUrl).string_len(1024))
                    .col(ColumnDef::new(Licenses::Notes).text())
                    .col(ColumnDef::new(Licenses::CreatedBy).string_len(36))
                    .col(
                        ColumnDef::new(Licenses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Licenses::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_licenses_facility")
                            .from(Licenses::Table, Licenses::FacilityId)
                            .to(Facilities::Table, Facilities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: facility_id
        manager
            .create_index(
                Index::create()
                    .name("idx_licenses_facility_id")
                    .table(Licenses::Table)
                    .col(Licenses::FacilityId)
                    .to_owned(),
            )
            .await?;

        // Index: expiry_date (expiring-soon queries)
        manager
            .create_index(
                Index::create()
                    .name("idx_licenses_expiry_date")
                    .table(Licenses::Table)
                    .col(Licenses::ExpiryDate)
                    .to_owned(),
            )
            .await?;

        // Index: status
        manager
            .create_index(
                Index::create()
                    .name("idx_licenses_status")
                    .table(Licenses::Table)
                    .col(Licenses::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Licenses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Licenses {
    Table,
    Id,
    FacilityId,
    LicenseNumber,
    LicenseType,
    IssuingAuthority,
    IssueDate,
    ExpiryDate,
    Status,
    DocumentUrl,
    Notes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Facilities {
    Table,
    Id,
}
