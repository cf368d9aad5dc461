use sea_orm::entity::prelude::*;

/// One proof submission. At most one row may exist per
/// (user_address, task_id) pair, enforced by a unique index.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "verifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_address: String,
    pub task_id: i32,
    pub proof_kind: String,
    pub proof_url: Option<String>,
    pub screenshot_path: Option<String>,
    pub user_name: Option<String>,
    pub additional_notes: Option<String>,
    pub status: String,
    pub submitted_at: i64,
    pub verified_at: Option<i64>,
    pub verified_by: Option<String>,
    pub reward_distributed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
