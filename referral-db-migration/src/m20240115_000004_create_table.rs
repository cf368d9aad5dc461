use referral_db_entity::db::*;
use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240115_000004_create_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(withdrawals::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(withdrawals::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(withdrawals::Column::UserAddress)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(withdrawals::Column::Amount)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(withdrawals::Column::Fee).decimal().not_null())
                    .col(
                        ColumnDef::new(withdrawals::Column::FeeMethod)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(withdrawals::Column::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(withdrawals::Column::SettlementRef).string())
                    .col(
                        ColumnDef::new(withdrawals::Column::RequestedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(withdrawals::Column::ProcessedAt).big_integer())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(withdrawals::Entity).to_owned())
            .await
    }
}
