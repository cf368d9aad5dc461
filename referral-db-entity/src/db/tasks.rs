use sea_orm::entity::prelude::*;

/// Catalog of completable social-media actions. `task_id` is the stable
/// join key used by verifications; `id` is only the storage row id.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub task_id: i32,
    pub platform: String,
    pub task_type: String,
    pub task_name: String,
    pub reward: Decimal,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
