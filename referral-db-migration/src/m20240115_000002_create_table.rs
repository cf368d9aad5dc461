use referral_db_entity::db::*;
use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240115_000002_create_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(tasks::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(tasks::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(tasks::Column::TaskId).integer().not_null())
                    .col(ColumnDef::new(tasks::Column::Platform).string().not_null())
                    .col(ColumnDef::new(tasks::Column::TaskType).string().not_null())
                    .col(ColumnDef::new(tasks::Column::TaskName).string().not_null())
                    .col(ColumnDef::new(tasks::Column::Reward).decimal().not_null())
                    .col(
                        ColumnDef::new(tasks::Column::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(tasks::Entity).to_owned())
            .await
    }
}
