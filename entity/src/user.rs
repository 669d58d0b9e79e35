use sea_orm::entity::prelude::*;

/// Marketplace user. Owned by the wider platform; the payout service only reads it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
    /// One of `academy`, `admin`, `user`.
    pub role: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payout_account::Entity")]
    PayoutAccount,
}

impl Related<super::payout_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayoutAccount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
