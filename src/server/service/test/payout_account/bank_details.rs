use chrono::Utc;

use super::*;
use crate::server::{
    messaging::mock::RecordingMessageGateway,
    model::payout_account::BankInformation,
    service::outbox::dispatcher::OutboxDispatcher,
};

fn update_params(user_id: i32) -> UpdateBankDetailsParams {
    UpdateBankDetailsParams {
        user_id,
        bank_information: bank_information(),
    }
}

/// Tests updating bank details and running the submission job.
///
/// Verifies that the details are stored as pending, audited with a masked account number
/// and marked submitted once the worker has sent them to the provider.
///
/// Expected: Ok with bank details pending, then submitted after the worker run
#[tokio::test]
async fn stores_bank_details_and_submits_them_in_background() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_academy_user(db).await?;
    factory::payout_account::PayoutAccountFactory::new(db, user.id)
        .product_configuration_id(MOCK_PRODUCT_ID)
        .build()
        .await?;
    let provider = Arc::new(MockPaymentProvider::new());
    let service = PayoutAccountService::new(db, provider.as_ref());

    let account = service
        .update_bank_details(update_params(user.id), AuditContext::system())
        .await?;

    assert_eq!(account.bank_information, Some(bank_information()));
    assert_eq!(account.bank_details_status, Some(BankDetailsStatus::Pending));
    assert_eq!(account.activation_status, ActivationStatus::Pending);
    assert_eq!(count_kind(db, BANK_DETAILS_UPDATE_KIND).await?, 1);
    assert_eq!(provider.calls_to("update_settlement_details"), 0);

    let trail = AuditService::new(db)
        .list_for_entity(PAYOUT_ACCOUNT_ENTITY, &account.id)
        .await?;
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action_type, "payout_bank_details_updated");
    assert_eq!(
        trail[0].metadata,
        json!({ "account_number": "XXXXXXXX9012", "ifsc_code": "HDFC0001234" })
    );

    let gateway = Arc::new(RecordingMessageGateway::new());
    OutboxDispatcher::new(db, provider.clone(), gateway, 5)
        .process_due(Utc::now())
        .await?;

    assert_eq!(provider.calls_to("update_settlement_details"), 1);
    assert_eq!(
        provider.state.lock().unwrap().settlements,
        vec![bank_information()]
    );
    let submitted = service.get_for_user(user.id, false).await?;
    assert_eq!(
        submitted.bank_details_status,
        Some(BankDetailsStatus::Submitted)
    );

    Ok(())
}

/// Tests the status sync run by a bank details update deduplicating requirements.
///
/// Expected: Ok with the account needing clarification and a single stored requirement
#[tokio::test]
async fn bank_details_update_stores_deduplicated_requirements() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_academy_user(db).await?;
    factory::payout_account::PayoutAccountFactory::new(db, user.id)
        .product_configuration_id(MOCK_PRODUCT_ID)
        .build()
        .await?;
    let provider = MockPaymentProvider::new().configure(|s| {
        s.product_status = Some("needs_clarification".to_string());
        s.product_requirements = vec![
            Requirement::Detail {
                description: Some("PAN verification".to_string()),
                field_reference: None,
            },
            Requirement::Detail {
                description: Some("PAN verification".to_string()),
                field_reference: Some("kyc.pan".to_string()),
            },
        ];
    });

    let account = PayoutAccountService::new(db, &provider)
        .update_bank_details(update_params(user.id), AuditContext::system())
        .await?;

    assert_eq!(account.activation_status, ActivationStatus::NeedsClarification);
    assert_eq!(
        account.activation_requirements,
        Some(vec!["PAN verification".to_string()])
    );

    Ok(())
}

/// Tests updating bank details on an account without a product configuration.
///
/// Expected: Ok with the existing configuration fetched and stored
#[tokio::test]
async fn fetches_missing_product_configuration() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (user, _) = factory::helpers::create_payout_account_with_user(db).await?;
    let provider = MockPaymentProvider::new();

    let account = PayoutAccountService::new(db, &provider)
        .update_bank_details(update_params(user.id), AuditContext::system())
        .await?;

    assert_eq!(
        account.product_configuration_id.as_deref(),
        Some(MOCK_PRODUCT_ID)
    );
    assert_eq!(provider.calls_to("get_product_configuration"), 1);
    assert_eq!(provider.calls_to("request_product_configuration"), 0);

    Ok(())
}

/// Tests updating bank details when no product configuration can be obtained.
///
/// Expected: Err(Upstream) and nothing stored or queued
#[tokio::test]
async fn fails_without_product_configuration() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (user, stored) = factory::helpers::create_payout_account_with_user(db).await?;
    let provider = MockPaymentProvider::new().configure(|s| {
        s.fail_get_product = true;
        s.fail_request_product = true;
    });

    let result = PayoutAccountService::new(db, &provider)
        .update_bank_details(update_params(user.id), AuditContext::system())
        .await;

    assert!(matches!(result, Err(AppError::Upstream(_))));
    let unchanged = entity::prelude::PayoutAccount::find_by_id(stored.id.clone())
        .one(db)
        .await?
        .unwrap();
    assert!(unchanged.account_number.is_none());
    assert!(outbox_kinds(db).await?.is_empty());

    Ok(())
}

/// Tests updating bank details for a user without an account.
///
/// Expected: Err(NotFound)
#[tokio::test]
async fn fails_without_active_account() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_academy_user(db).await?;
    let provider = MockPaymentProvider::new();

    let result = PayoutAccountService::new(db, &provider)
        .update_bank_details(update_params(user.id), AuditContext::system())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

/// Tests that a stale submission doesn't mark newer bank details as submitted.
///
/// Expected: Ok with bank details still pending
#[tokio::test]
async fn stale_submission_leaves_newer_details_pending() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (user, _) = factory::helpers::create_payout_account_with_user(db).await?;
    let provider = MockPaymentProvider::new();
    let service = PayoutAccountService::new(db, &provider);

    let account = service
        .update_bank_details(update_params(user.id), AuditContext::system())
        .await?;

    let superseded = BankInformation {
        account_number: "998877665544".to_string(),
        ..bank_information()
    };
    let after = service
        .mark_bank_details_submitted(&account.id, &superseded)
        .await?;

    assert_eq!(after.bank_details_status, Some(BankDetailsStatus::Pending));
    assert_eq!(after.version, account.version);

    Ok(())
}
