use super::*;

/// Tests filtering the admin listing by status.
///
/// Expected: Ok with only the matching accounts counted
#[tokio::test]
async fn filters_by_status() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    for status in ["pending", "pending", "activated"] {
        let user = factory::create_academy_user(db).await?;
        factory::payout_account::PayoutAccountFactory::new(db, user.id)
            .activation_status(status)
            .build()
            .await?;
    }
    let provider = MockPaymentProvider::new();

    let page = PayoutAccountService::new(db, &provider)
        .list_paginated(Some("pending"), 0, 10)
        .await?;

    assert_eq!(page.total, 2);
    assert!(page
        .accounts
        .iter()
        .all(|account| account.activation_status == ActivationStatus::Pending));

    Ok(())
}

/// Tests an unknown status filter.
///
/// Expected: Err(BadRequest)
#[tokio::test]
async fn rejects_unknown_status() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let provider = MockPaymentProvider::new();

    let result = PayoutAccountService::new(db, &provider)
        .list_paginated(Some("frozen"), 0, 10)
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests that oversized pages are clamped.
///
/// Expected: Ok with per_page of 100
#[tokio::test]
async fn clamps_page_size() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let provider = MockPaymentProvider::new();

    let page = PayoutAccountService::new(db, &provider)
        .list_paginated(None, 0, 5000)
        .await?;

    assert_eq!(page.per_page, 100);
    assert_eq!(page.total, 0);

    Ok(())
}
