use super::*;

/// Tests creating a payout account for a proprietorship.
///
/// Verifies that the linked account and product configuration are requested, the
/// stakeholder is queued rather than registered inline and the creation is audited and
/// notified on every channel.
///
/// Expected: Ok with a pending account referencing the provider IDs
#[tokio::test]
async fn creates_account_and_queues_side_effects() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_academy_user(db).await?;
    let provider = MockPaymentProvider::new();

    let account = PayoutAccountService::new(db, &provider)
        .create(
            create_params(user.id, BusinessType::Proprietorship),
            AuditContext::system(),
        )
        .await?;

    assert_eq!(account.user_id, user.id);
    assert_eq!(account.razorpay_account_id, MOCK_ACCOUNT_ID);
    assert_eq!(account.activation_status, ActivationStatus::Pending);
    assert_eq!(
        account.product_configuration_id.as_deref(),
        Some(MOCK_PRODUCT_ID)
    );
    assert!(account.stakeholder_id.is_none());
    assert!(account.is_active);

    let state = provider.state.lock().unwrap();
    let request = &state.linked_account_requests[0];
    assert_eq!(request.reference_id.len(), 20);
    assert!(!request.reference_id.contains('-'));
    assert!(request.legal_info.is_some());
    drop(state);
    assert_eq!(provider.calls_to("create_stakeholder"), 0);

    assert_eq!(count_kind(db, STAKEHOLDER_CREATE_KIND).await?, 1);
    for kind in [PUSH_KIND, EMAIL_KIND, SMS_KIND, WHATSAPP_KIND] {
        assert_eq!(count_kind(db, kind).await?, 1);
    }

    let trail = AuditService::new(db)
        .list_for_entity(PAYOUT_ACCOUNT_ENTITY, &account.id)
        .await?;
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action_type, "payout_account_created");

    Ok(())
}

/// Tests creating a payout account for an individual.
///
/// Verifies that no legal info is sent for individuals and that nothing about the
/// stakeholder or bank details is recorded until their jobs run.
///
/// Expected: Ok with stakeholder ID and bank details status unset
#[tokio::test]
async fn creates_individual_account_without_legal_info() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_academy_user(db).await?;
    let provider = MockPaymentProvider::new();

    let account = PayoutAccountService::new(db, &provider)
        .create(
            create_params(user.id, BusinessType::Individual),
            AuditContext::system(),
        )
        .await?;

    assert!(account.stakeholder_id.is_none());
    assert!(account.bank_details_status.is_none());
    assert!(account.bank_information.is_none());
    assert!(provider.state.lock().unwrap().linked_account_requests[0]
        .legal_info
        .is_none());

    Ok(())
}

/// Tests creating a payout account with bank information.
///
/// Expected: Ok with bank details pending and exactly one bank details job queued
#[tokio::test]
async fn queues_single_bank_details_job_when_created_with_bank_information(
) -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_academy_user(db).await?;
    let provider = MockPaymentProvider::new();

    let mut params = create_params(user.id, BusinessType::Proprietorship);
    params.bank_information = Some(bank_information());

    let account = PayoutAccountService::new(db, &provider)
        .create(params, AuditContext::system())
        .await?;

    assert_eq!(account.activation_status, ActivationStatus::Pending);
    assert_eq!(account.bank_details_status, Some(BankDetailsStatus::Pending));
    assert_eq!(account.bank_information, Some(bank_information()));
    assert_eq!(count_kind(db, BANK_DETAILS_UPDATE_KIND).await?, 1);
    assert_eq!(provider.calls_to("update_settlement_details"), 0);

    Ok(())
}

/// Tests that a user with an active account can't create another.
///
/// Expected: Err(Conflict) before the provider is contacted
#[tokio::test]
async fn rejects_user_with_active_account() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (user, _) = factory::helpers::create_payout_account_with_user(db).await?;
    let provider = MockPaymentProvider::new();

    let result = PayoutAccountService::new(db, &provider)
        .create(
            create_params(user.id, BusinessType::Proprietorship),
            AuditContext::system(),
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(provider.calls_to("create_linked_account"), 0);

    Ok(())
}

/// Tests two simultaneous creations for the same user.
///
/// Both requests pass the existence check before either inserts; the partial unique
/// index decides the winner.
///
/// Expected: one Ok, one Err(Conflict) and a single active account
#[tokio::test]
async fn concurrent_creations_yield_single_active_account() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_academy_user(db).await?;
    let provider =
        MockPaymentProvider::new().with_linked_account_barrier(Arc::new(Barrier::new(2)));
    let service = PayoutAccountService::new(db, &provider);

    let (first, second) = tokio::join!(
        service.create(
            create_params(user.id, BusinessType::Proprietorship),
            AuditContext::system()
        ),
        service.create(
            create_params(user.id, BusinessType::Proprietorship),
            AuditContext::system()
        ),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(AppError::Conflict(_))))
            .count(),
        1
    );

    let active = entity::prelude::PayoutAccount::find()
        .filter(entity::payout_account::Column::UserId.eq(user.id))
        .filter(entity::payout_account::Column::IsActive.eq(true))
        .all(db)
        .await?;
    assert_eq!(active.len(), 1);

    Ok(())
}

/// Tests that a provider refusal is surfaced to the caller.
///
/// Expected: Err(Upstream) carrying the provider message, nothing stored
#[tokio::test]
async fn surfaces_linked_account_failure() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_academy_user(db).await?;
    let provider = MockPaymentProvider::new().configure(|s| {
        s.fail_linked_account = Some("Invalid PAN".to_string());
    });

    let result = PayoutAccountService::new(db, &provider)
        .create(
            create_params(user.id, BusinessType::Proprietorship),
            AuditContext::system(),
        )
        .await;

    match result {
        Err(AppError::Upstream(message)) => {
            assert_eq!(message, "Failed to create payout account: Invalid PAN")
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
    assert!(entity::prelude::PayoutAccount::find()
        .all(db)
        .await?
        .is_empty());
    assert!(outbox_kinds(db).await?.is_empty());

    Ok(())
}

/// Tests that a failed product configuration request doesn't fail creation.
///
/// Expected: Ok without a product configuration and the error kept in metadata
#[tokio::test]
async fn creates_account_when_product_configuration_fails() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_academy_user(db).await?;
    let provider = MockPaymentProvider::new().configure(|s| s.fail_request_product = true);

    let account = PayoutAccountService::new(db, &provider)
        .create(
            create_params(user.id, BusinessType::Proprietorship),
            AuditContext::system(),
        )
        .await?;

    assert!(account.product_configuration_id.is_none());
    assert!(account.metadata.get("product_configuration_error").is_some());

    Ok(())
}

/// Tests creating an account with bank details when no product configuration can be had.
///
/// Expected: Ok without bank details, no submission queued and the error kept in metadata
#[tokio::test]
async fn records_bank_details_error_when_unconfigurable() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_academy_user(db).await?;
    let provider = MockPaymentProvider::new().configure(|s| {
        s.fail_request_product = true;
        s.fail_get_product = true;
    });

    let mut params = create_params(user.id, BusinessType::Proprietorship);
    params.bank_information = Some(bank_information());
    let account = PayoutAccountService::new(db, &provider)
        .create(params, AuditContext::system())
        .await?;

    assert!(account.bank_information.is_none());
    assert_eq!(count_kind(db, BANK_DETAILS_UPDATE_KIND).await?, 0);
    let error = account.metadata["bank_details_error"].as_str().unwrap();
    assert!(error.starts_with("Unable to configure payouts"));

    Ok(())
}

/// Tests that an explicit stakeholder without a PAN is skipped.
///
/// Expected: Ok with no stakeholder job and the skip recorded in metadata
#[tokio::test]
async fn skips_stakeholder_without_pan() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_academy_user(db).await?;
    let provider = MockPaymentProvider::new();

    let mut params = create_params(user.id, BusinessType::Partnership);
    params.stakeholder = Some(StakeholderData {
        name: "Vikram Rao".to_string(),
        email: "vikram@riverside.example".to_string(),
        phone: None,
        relationship: "partner".to_string(),
        pan: None,
    });

    let account = PayoutAccountService::new(db, &provider)
        .create(params, AuditContext::system())
        .await?;

    assert_eq!(account.metadata.get("stakeholder_skipped"), Some(&json!(true)));
    assert_eq!(count_kind(db, STAKEHOLDER_CREATE_KIND).await?, 0);

    Ok(())
}

/// Tests creating an account for a user that doesn't exist.
///
/// Expected: Err(NotFound)
#[tokio::test]
async fn fails_for_unknown_user() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let provider = MockPaymentProvider::new();

    let result = PayoutAccountService::new(db, &provider)
        .create(
            create_params(4242, BusinessType::Proprietorship),
            AuditContext::system(),
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
