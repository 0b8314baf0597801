use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "referral_links")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::referral_click::Entity")]
    ReferralClick,
}

impl Related<super::referral_click::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReferralClick.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
