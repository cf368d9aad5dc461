use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub wallet_address: String,
    pub upline_address: Option<String>,
    pub is_active: bool,
    pub activation_time: Option<i64>,
    pub total_earned: Decimal,
    pub locked_tokens: Decimal,
    pub total_withdrawn: Decimal,
    pub direct_referrals: i32,
    pub join_time: i64,
    pub last_claim_time: i64,
    pub completed_tasks: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
