//! Create menu table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Menu::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Menu::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Menu::RestaurantId).string_len(32).not_null())
                    .col(ColumnDef::new(Menu::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Menu::UploadDate).date().not_null())
                    .col(
                        ColumnDef::new(Menu::VoteCount)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Menu::VoteCount).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Menu::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Menu::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_restaurant")
                            .from(Menu::Table, Menu::RestaurantId)
                            .to(Restaurant::Table, Restaurant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (restaurant_id, upload_date) - one menu per restaurant per day
        manager
            .create_index(
                Index::create()
                    .name("idx_menu_restaurant_upload_date")
                    .table(Menu::Table)
                    .col(Menu::RestaurantId)
                    .col(Menu::UploadDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (upload_date, vote_count) - ranking a day's candidates
        manager
            .create_index(
                Index::create()
                    .name("idx_menu_upload_date_vote_count")
                    .table(Menu::Table)
                    .col(Menu::UploadDate)
                    .col(Menu::VoteCount)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Menu::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Menu {
    Table,
    Id,
    RestaurantId,
    Description,
    UploadDate,
    VoteCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Restaurant {
    Table,
    Id,
}
