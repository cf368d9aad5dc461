use sea_orm::entity::prelude::*;

/// Registration relationship between an upline and a downline wallet.
/// Level is always 1; multi-level propagation was never implemented
/// upstream of this schema.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "referral_edges")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub referrer: String,
    pub referee: String,
    pub level: i32,
    pub reward_earned: Decimal,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
