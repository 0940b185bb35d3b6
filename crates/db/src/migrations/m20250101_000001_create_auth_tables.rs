//! Create `auth_user`, `profiles` and `user_roles` tables migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuthUser::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AuthUser::Id).string_len(36).not_null().primary_key())
                    .col(ColumnDef::new(AuthUser::Email).string_len(320).not_null().unique_key())
                    .col(ColumnDef::new(AuthUser::PasswordHash).string_len(256).not_null())
                    .col(ColumnDef::new(AuthUser::Token).string_len(64).unique_key())
                    .col(
                        ColumnDef::new(AuthUser::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(AuthUser::LastSignInAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Profiles::Id).string_len(36).not_null().primary_key())
                    .col(ColumnDef::new(Profiles::FullName).string_len(256))
                    .col(ColumnDef::new(Profiles::Phone).string_len(32))
                    .col(ColumnDef::new(Profiles::JobTitle).string_len(128))
                    .col(ColumnDef::new(Profiles::Department).string_len(128))
                    .col(ColumnDef::new(Profiles::AvatarUrl).string_len(1024))
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Profiles::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profiles_auth_user")
                            .from(Profiles::Table, Profiles::Id)
                            .to(AuthUser::Table, AuthUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserRoles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserRoles::Id).string_len(36).not_null().primary_key())
                    .col(ColumnDef::new(UserRoles::UserId).string_len(36).not_null().unique_key())
                    .col(
                        ColumnDef::new(UserRoles::Role)
                            .string_len(16)
                            .not_null()
                            .default("user"),
                    )
                    .col(
                        ColumnDef::new(UserRoles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_roles_auth_user")
                            .from(UserRoles::Table, UserRoles::UserId)
                            .to(AuthUser::Table, AuthUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AuthUser::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AuthUser {
    Table,
    Id,
    Email,
    PasswordHash,
    Token,
    CreatedAt,
    LastSignInAt,
}

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
    FullName,
    Phone,
    JobTitle,
    Department,
    AvatarUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum UserRoles {
    Table,
    Id,
    UserId,
    Role,
    CreatedAt,
}
