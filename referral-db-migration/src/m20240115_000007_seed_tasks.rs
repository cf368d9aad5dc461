use referral_db_entity::db::*;
use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240115_000007_seed_tasks"
    }
}

// (task_id, platform, task_type, task_name, reward)
const TASK_CATALOG: [(i32, &str, &str, &str, i64); 20] = [
    (0, "facebook", "follow", "Follow Facebook Page", 100),
    (1, "facebook", "like", "Like Facebook Post", 50),
    (2, "facebook", "share", "Share Facebook Post", 50),
    (3, "facebook", "comment", "Comment on Facebook Post", 50),
    (4, "twitter", "follow", "Follow Twitter Account", 100),
    (5, "twitter", "like", "Like Tweet", 50),
    (6, "twitter", "retweet", "Retweet", 50),
    (7, "twitter", "comment", "Comment on Tweet", 50),
    (8, "instagram", "follow", "Follow Instagram Account", 100),
    (9, "instagram", "like", "Like Instagram Post", 50),
    (10, "instagram", "share", "Share Instagram Post", 50),
    (11, "instagram", "comment", "Comment on Instagram Post", 50),
    (12, "youtube", "subscribe", "Subscribe YouTube Channel", 100),
    (13, "youtube", "like", "Like YouTube Video", 50),
    (14, "youtube", "share", "Share YouTube Video", 50),
    (15, "youtube", "comment", "Comment on YouTube Video", 50),
    (16, "telegram", "join", "Join Telegram Channel", 100),
    (17, "telegram", "join", "Join Telegram Group", 100),
    (18, "telegram", "share", "Share Telegram Post", 50),
    (19, "telegram", "comment", "Comment in Telegram Group", 50),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert()
            .into_table(tasks::Entity)
            .columns([
                tasks::Column::TaskId,
                tasks::Column::Platform,
                tasks::Column::TaskType,
                tasks::Column::TaskName,
                tasks::Column::Reward,
                tasks::Column::IsActive,
            ])
            .to_owned();

        for (task_id, platform, task_type, task_name, reward) in TASK_CATALOG {
            insert.values_panic([
                task_id.into(),
                platform.into(),
                task_type.into(),
                task_name.into(),
                reward.into(),
                true.into(),
            ]);
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(tasks::Entity).to_owned())
            .await
    }
}
