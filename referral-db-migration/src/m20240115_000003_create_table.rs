use referral_db_entity::db::*;
use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240115_000003_create_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(verifications::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(verifications::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(verifications::Column::UserAddress)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(verifications::Column::TaskId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(verifications::Column::ProofKind)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(verifications::Column::ProofUrl).string())
                    .col(ColumnDef::new(verifications::Column::ScreenshotPath).string())
                    .col(ColumnDef::new(verifications::Column::UserName).string())
                    .col(ColumnDef::new(verifications::Column::AdditionalNotes).string())
                    .col(
                        ColumnDef::new(verifications::Column::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(verifications::Column::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(verifications::Column::VerifiedAt).big_integer())
                    .col(ColumnDef::new(verifications::Column::VerifiedBy).string())
                    .col(
                        ColumnDef::new(verifications::Column::RewardDistributed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(verifications::Entity).to_owned())
            .await
    }
}
