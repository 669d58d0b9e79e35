use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payout_account")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: i32,
    pub razorpay_account_id: String,

    // KYC snapshot
    pub legal_business_name: String,
    pub business_type: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub pan: String,
    pub gst: Option<String>,
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,

    // Bank information
    pub account_number: Option<String>,
    pub ifsc_code: Option<String>,
    pub account_holder_name: Option<String>,
    pub bank_name: Option<String>,

    pub activation_status: String,
    pub activation_requirements: Option<Json>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,
    pub product_configuration_id: Option<String>,
    pub product_configuration_status: Option<String>,
    pub stakeholder_id: Option<String>,
    pub bank_details_status: Option<String>,
    pub metadata: Json,
    pub is_active: bool,
    /// Optimistic lock counter, bumped on every write.
    pub version: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
