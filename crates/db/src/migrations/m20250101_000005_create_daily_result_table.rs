//! Create daily result table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DailyResult::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DailyResult::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DailyResult::VotingDate)
                            .date()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(DailyResult::WinningMenuId).string_len(32))
                    .col(
                        ColumnDef::new(DailyResult::Finalized)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(DailyResult::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(DailyResult::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_daily_result_winning_menu")
                            .from(DailyResult::Table, DailyResult::WinningMenuId)
                            .to(Menu::Table, Menu::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DailyResult::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DailyResult {
    Table,
    Id,
    VotingDate,
    WinningMenuId,
    Finalized,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Menu {
    Table,
    Id,
}
