use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

use crate::server::model::payout_account::{
    Address, BankInformation, BusinessType, CreatePayoutAccountParams, KycDetails,
};

mod outbox;
mod payout_account;

fn kyc_details(business_type: BusinessType) -> KycDetails {
    KycDetails {
        legal_business_name: "Riverside Cricket Academy".to_string(),
        business_type,
        contact_name: "Asha Rao".to_string(),
        email: "asha@riverside.example".to_string(),
        phone: "9876543210".to_string(),
        pan: "ABCPR1234K".to_string(),
        gst: None,
        address: Address {
            street1: "12 Stadium Road".to_string(),
            street2: None,
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            postal_code: "560001".to_string(),
            country: "IN".to_string(),
        },
    }
}

fn bank_information() -> BankInformation {
    BankInformation {
        account_number: "123456789012".to_string(),
        ifsc_code: "HDFC0001234".to_string(),
        account_holder_name: "Asha Rao".to_string(),
        bank_name: Some("HDFC Bank".to_string()),
    }
}

fn create_params(user_id: i32, business_type: BusinessType) -> CreatePayoutAccountParams {
    CreatePayoutAccountParams {
        user_id,
        kyc_details: kyc_details(business_type),
        bank_information: None,
        stakeholder: None,
    }
}

/// Kinds of every queued outbox event, oldest first.
async fn outbox_kinds(db: &DatabaseConnection) -> Result<Vec<String>, DbErr> {
    Ok(entity::prelude::OutboxEvent::find()
        .order_by_asc(entity::outbox_event::Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(|event| event.kind)
        .collect())
}

async fn count_kind(db: &DatabaseConnection, kind: &str) -> Result<usize, DbErr> {
    Ok(entity::prelude::OutboxEvent::find()
        .filter(entity::outbox_event::Column::Kind.eq(kind))
        .all(db)
        .await?
        .len())
}
