//! Create `facilities` table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Facilities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Facilities::Id).string_len(36).not_null().primary_key())
                    .col(ColumnDef::new(Facilities::NameFr).string_len(256).not_null())
                    .col(ColumnDef::new(Facilities::NameAr).string_len(256).not_null())
                    .col(ColumnDef::new(Facilities::Sector).string_len(32).not_null())
                    .col(ColumnDef::new(Facilities::Jurisdiction).string_len(16).not_null())
                    .col(ColumnDef::new(Facilities::Ownership).string_len(32).not_null())
                    .col(ColumnDef::new(Facilities::LegalDomain).string_len(16).not_null())
                    .col(ColumnDef::new(Facilities::DivisionId).string_len(36))
                    .col(ColumnDef::new(Facilities::Region).string_len(256))
                    .col(ColumnDef::new(Facilities::Address).text())
                    .col(ColumnDef::new(Facilities::Description).text())
                    .col(ColumnDef::new(Facilities::GpsCoordinates).string_len(64))
                    .col(
                        ColumnDef::new(Facilities::Status)
                            .string_len(32)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Facilities::ImageUrl).string_len(1024))
                    .col(ColumnDef::new(Facilities::WebsiteUrl).string_len(1024))
                    .col(ColumnDef::new(Facilities::CreatedBy).string_len(36))
                    .col(
                        ColumnDef::new(Facilities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Facilities::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_facilities_division")
                            .from(Facilities::Table, Facilities::DivisionId)
                            .to(AdministrativeDivisions::Table, AdministrativeDivisions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: sector (sector pages, dashboard breakdown)
        manager
            .create_index(
                Index::create()
                    .name("idx_facilities_sector")
                    .table(Facilities::Table)
                    .col(Facilities::Sector)
                    .to_owned(),
            )
            .await?;

        // Index: status
        manager
            .create_index(
                Index::create()
                    .name("idx_facilities_status")
                    .table(Facilities::Table)
                    .col(Facilities::Status)
                    .to_owned(),
            )
            .await?;

        // Index: division_id
        manager
            .create_index(
                Index::create()
                    .name("idx_facilities_division_id")
                    .table(Facilities::Table)
                    .col(Facilities::DivisionId)
                    .to_owned(),
            )
            .await?;

        // Index: created_at
        manager
            .create_index(
                Index::create()
                    .name("idx_facilities_created_at")
                    .table(Facilities::Table)
                    .col(Facilities::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Facilities::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Facilities {
    Table,
    Id,
    NameFr,
    NameAr,
    Sector,
    Jurisdiction,
    Ownership,
    LegalDomain,
    DivisionId,
    Region,
    Address,
    Description,
    GpsCoordinates,
    Status,
    ImageUrl,
    WebsiteUrl,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AdministrativeDivisions {
    Table,
    Id,
}
