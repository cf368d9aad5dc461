use referral_db_entity::db::*;
use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240115_000005_create_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(referral_edges::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(referral_edges::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(referral_edges::Column::Referrer)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(referral_edges::Column::Referee)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(referral_edges::Column::Level)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(referral_edges::Column::RewardEarned)
                            .decimal()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(referral_edges::Column::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(referral_edges::Entity).to_owned())
            .await
    }
}
