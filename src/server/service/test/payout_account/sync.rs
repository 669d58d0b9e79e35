use chrono::Utc;

use super::*;
use crate::server::{
    data::notification::NotificationRepository, messaging::mock::RecordingMessageGateway,
    model::notification::ACADEMY_RECIPIENT, service::outbox::dispatcher::OutboxDispatcher,
};

/// Tests a pending account being rejected by the provider.
///
/// Verifies that both the status change and the rejection are audited, and that once the
/// worker runs the academy hears about it on every channel with the provider's reason.
///
/// Expected: Ok with status rejected and one delivery per channel mentioning the reason
#[tokio::test]
async fn rejection_is_audited_and_notified_on_every_channel() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, stored) = factory::helpers::create_payout_account_with_user(db).await?;
    let provider = Arc::new(MockPaymentProvider::new().configure(|s| {
        s.account_status = Some("rejected".to_string());
        s.rejection_reason = Some("KYC mismatch".to_string());
    }));

    let account = PayoutAccountService::new(db, provider.as_ref())
        .sync_by_id(&stored.id, AuditContext::system())
        .await?;

    assert_eq!(account.activation_status, ActivationStatus::Rejected);
    assert_eq!(account.rejection_reason.as_deref(), Some("KYC mismatch"));

    let actions: Vec<String> = AuditService::new(db)
        .list_for_entity(PAYOUT_ACCOUNT_ENTITY, &account.id)
        .await?
        .into_iter()
        .map(|record| record.action_type)
        .collect();
    assert_eq!(
        actions,
        vec![
            "payout_status_changed".to_string(),
            "payout_account_rejected".to_string()
        ]
    );

    let gateway = Arc::new(RecordingMessageGateway::new());
    let stats = OutboxDispatcher::new(db, provider.clone(), gateway.clone(), 5)
        .process_due(Utc::now())
        .await?;
    assert_eq!(stats.processed, 4);

    let emails = gateway.emails.lock().unwrap();
    let sms = gateway.sms.lock().unwrap();
    let whatsapp = gateway.whatsapp.lock().unwrap();
    let pushes = gateway.pushes.lock().unwrap();
    assert_eq!(emails.len(), 1);
    assert_eq!(sms.len(), 1);
    assert_eq!(whatsapp.len(), 1);
    assert_eq!(pushes.len(), 1);
    assert!(emails[0].body.contains("KYC mismatch"));
    assert!(sms[0].body.contains("KYC mismatch"));
    assert!(whatsapp[0].body.contains("KYC mismatch"));
    assert!(pushes[0].body.contains("KYC mismatch"));

    Ok(())
}

/// Tests syncing twice against unchanged provider state.
///
/// Expected: Ok with no write, audit entry or notification on the second sync
#[tokio::test]
async fn repeated_sync_is_idempotent() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (user, stored) = factory::helpers::create_payout_account_with_user(db).await?;
    let provider =
        MockPaymentProvider::new().configure(|s| s.account_status = Some("activated".to_string()));
    let service = PayoutAccountService::new(db, &provider);
    let notifications = NotificationRepository::new(db);

    let first = service.sync_by_id(&stored.id, AuditContext::system()).await?;
    let queued = outbox_kinds(db).await?.len();
    let in_app = notifications
        .get_by_recipient(ACADEMY_RECIPIENT, user.id)
        .await?
        .len();
    assert!(queued > 0);
    assert_eq!(in_app, 1);

    let second = service.sync_by_id(&stored.id, AuditContext::system()).await?;

    assert_eq!(first.activation_status, ActivationStatus::Activated);
    assert_eq!(second.activation_status, ActivationStatus::Activated);
    assert_eq!(first.version, second.version);

    let trail = AuditService::new(db)
        .list_for_entity(PAYOUT_ACCOUNT_ENTITY, &stored.id)
        .await?;
    assert_eq!(trail.len(), 2);
    assert_eq!(outbox_kinds(db).await?.len(), queued);
    assert_eq!(
        notifications
            .get_by_recipient(ACADEMY_RECIPIENT, user.id)
            .await?
            .len(),
        in_app
    );

    Ok(())
}

/// Tests that the product configuration status outranks the account status.
///
/// Verifies that requirements come from the product, flattened and de-duplicated.
///
/// Expected: Ok with needs_clarification and two distinct requirements
#[tokio::test]
async fn product_status_takes_precedence_and_requirements_are_deduplicated(
) -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_academy_user(db).await?;
    let stored = factory::payout_account::PayoutAccountFactory::new(db, user.id)
        .product_configuration_id(MOCK_PRODUCT_ID)
        .build()
        .await?;
    let provider = MockPaymentProvider::new().configure(|s| {
        s.account_status = Some("activated".to_string());
        s.product_status = Some("needs_clarification".to_string());
        s.product_requirements = vec![
            Requirement::Detail {
                description: Some("PAN verification".to_string()),
                field_reference: None,
            },
            Requirement::Text("PAN verification".to_string()),
            Requirement::Detail {
                description: None,
                field_reference: Some("settlements.ifsc_code".to_string()),
            },
        ];
    });

    let account = PayoutAccountService::new(db, &provider)
        .sync_by_id(&stored.id, AuditContext::system())
        .await?;

    assert_eq!(account.activation_status, ActivationStatus::NeedsClarification);
    assert_eq!(
        account.activation_requirements,
        Some(vec![
            "PAN verification".to_string(),
            "settlements.ifsc_code".to_string()
        ])
    );
    assert_eq!(
        account.product_configuration_status.as_deref(),
        Some("needs_clarification")
    );
    assert_eq!(count_kind(db, EMAIL_KIND).await?, 1);

    Ok(())
}

/// Tests activation of a pending account.
///
/// Expected: Ok with status activated, audited as a change and an activation
#[tokio::test]
async fn activation_is_audited() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (user, stored) = factory::helpers::create_payout_account_with_user(db).await?;
    let provider =
        MockPaymentProvider::new().configure(|s| s.account_status = Some("activated".to_string()));

    let account = PayoutAccountService::new(db, &provider)
        .sync_for_user(user.id, AuditContext::system())
        .await?;

    assert_eq!(account.id, stored.id);
    assert_eq!(account.activation_status, ActivationStatus::Activated);
    assert!(account.activation_requirements.is_none());

    let actions: Vec<String> = AuditService::new(db)
        .list_for_entity(PAYOUT_ACCOUNT_ENTITY, &stored.id)
        .await?
        .into_iter()
        .map(|record| record.action_type)
        .collect();
    assert_eq!(
        actions,
        vec![
            "payout_status_changed".to_string(),
            "payout_account_activated".to_string()
        ]
    );

    Ok(())
}

/// Tests a provider failure while syncing.
///
/// Expected: Err(Upstream) and the stored account left untouched
#[tokio::test]
async fn provider_failure_is_upstream_error() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let (_, stored) = factory::helpers::create_payout_account_with_user(db).await?;
    let provider = MockPaymentProvider::new().configure(|s| s.fail_account_details = true);

    let result = PayoutAccountService::new(db, &provider)
        .sync_by_id(&stored.id, AuditContext::system())
        .await;

    match result {
        Err(AppError::Upstream(message)) => {
            assert!(message.starts_with("Failed to sync payout account status"))
        }
        other => panic!("expected upstream error, got {:?}", other),
    }

    let unchanged = entity::prelude::PayoutAccount::find_by_id(stored.id.clone())
        .one(db)
        .await?
        .unwrap();
    assert_eq!(unchanged.version, stored.version);

    Ok(())
}

/// Tests syncing for a user without an account.
///
/// Expected: Err(NotFound)
#[tokio::test]
async fn sync_for_user_without_account_fails() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let user = factory::create_academy_user(db).await?;
    let provider = MockPaymentProvider::new();

    let result = PayoutAccountService::new(db, &provider)
        .sync_for_user(user.id, AuditContext::system())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

/// Tests the scheduled sync of undecided accounts.
///
/// Verifies that activated and rejected accounts are left alone.
///
/// Expected: Ok with only the pending and needs_clarification accounts synced
#[tokio::test]
async fn scheduled_sync_covers_undecided_accounts() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    for status in ["pending", "needs_clarification", "activated", "rejected"] {
        let user = factory::create_academy_user(db).await?;
        factory::payout_account::PayoutAccountFactory::new(db, user.id)
            .activation_status(status)
            .build()
            .await?;
    }
    let provider = MockPaymentProvider::new();

    let stats = PayoutAccountService::new(db, &provider)
        .sync_pending_accounts()
        .await?;

    assert_eq!(stats.synced, 2);
    assert_eq!(stats.failed, 0);
    assert_eq!(provider.calls_to("get_account_details"), 2);

    Ok(())
}
