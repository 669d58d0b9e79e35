use super::*;

/// Tests a versioned write against the current version.
///
/// Verifies that the mutable state is stored and the version is bumped.
///
/// Expected: Ok(Some) with the stored account at version 1
#[tokio::test]
async fn writes_when_version_matches() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_academy_user(db).await?;
    let repo = PayoutAccountRepository::new(db);
    let mut account = repo.create(new_account("pa_versioned", user.id)).await?;

    account.bank_information = Some(BankInformation {
        account_number: "123456789012".to_string(),
        ifsc_code: "HDFC0001234".to_string(),
        account_holder_name: "Asha Rao".to_string(),
        bank_name: Some("HDFC Bank".to_string()),
    });
    account.bank_details_status = Some(BankDetailsStatus::Pending);
    account.activation_status = ActivationStatus::NeedsClarification;
    account.activation_requirements = Some(vec!["Upload cancelled cheque".to_string()]);

    let stored = repo.update_versioned(&account).await?;

    assert!(stored.is_some());
    let stored = stored.unwrap();
    assert_eq!(stored.version, 1);
    assert_eq!(stored.bank_information, account.bank_information);
    assert_eq!(stored.bank_details_status, Some(BankDetailsStatus::Pending));
    assert_eq!(stored.activation_status, ActivationStatus::NeedsClarification);
    assert_eq!(
        stored.activation_requirements,
        Some(vec!["Upload cancelled cheque".to_string()])
    );

    Ok(())
}

/// Tests a versioned write based on a stale read.
///
/// Verifies that a writer holding an outdated version doesn't overwrite a newer write.
///
/// Expected: Ok(None) and the newer write is kept
#[tokio::test]
async fn refuses_stale_version() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_academy_user(db).await?;
    let repo = PayoutAccountRepository::new(db);
    let original = repo.create(new_account("pa_stale", user.id)).await?;

    let mut first = original.clone();
    first.activation_status = ActivationStatus::Activated;
    repo.update_versioned(&first).await?;

    let mut stale = original.clone();
    stale.activation_status = ActivationStatus::Rejected;
    let result = repo.update_versioned(&stale).await?;

    assert!(result.is_none());
    let stored = repo.find_by_id(&original.id).await?.unwrap();
    assert_eq!(stored.activation_status, ActivationStatus::Activated);
    assert_eq!(stored.version, 1);

    Ok(())
}
