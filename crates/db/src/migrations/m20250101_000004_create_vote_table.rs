//! Create vote table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vote::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vote::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vote::EmployeeId).string_len(32).not_null())
                    .col(ColumnDef::new(Vote::MenuId).string_len(32).not_null())
                    .col(ColumnDef::new(Vote::VotingDate).date().not_null())
                    .col(
                        ColumnDef::new(Vote::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Vote::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_employee")
                            .from(Vote::Table, Vote::EmployeeId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_menu")
                            .from(Vote::Table, Vote::MenuId)
                            .to(Menu::Table, Menu::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (employee_id, voting_date) - one vote per employee per day
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_employee_voting_date")
                    .table(Vote::Table)
                    .col(Vote::EmployeeId)
                    .col(Vote::VotingDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: menu_id (for counting a menu's live votes)
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_menu_id")
                    .table(Vote::Table)
                    .col(Vote::MenuId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vote::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Vote {
    Table,
    Id,
    EmployeeId,
    MenuId,
    VotingDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Menu {
    Table,
    Id,
}
