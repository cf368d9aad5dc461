use referral_db_entity::db::*;
use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240115_000006_create_index"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    // One submission per (user, task), whatever its status ended up as.
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_verifications_user_task")
                    .table(verifications::Entity)
                    .col(verifications::Column::UserAddress)
                    .col(verifications::Column::TaskId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_verifications_user_task")
                    .table(verifications::Entity)
                    .to_owned(),
            )
            .await
    }
}
