use super::*;

/// Tests creating a payout account.
///
/// Verifies that the repository stores the KYC snapshot and provider references and
/// starts the account active, at version 0, without bank information.
///
/// Expected: Ok with account created
#[tokio::test]
async fn creates_payout_account() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_academy_user(db).await?;

    let repo = PayoutAccountRepository::new(db);
    let account = repo.create(new_account("pa_create", user.id)).await?;

    assert_eq!(account.id, "pa_create");
    assert_eq!(account.user_id, user.id);
    assert_eq!(account.razorpay_account_id, "acc_pa_create");
    assert_eq!(account.kyc_details, kyc_details());
    assert_eq!(account.activation_status, ActivationStatus::Pending);
    assert_eq!(
        account.product_configuration_id.as_deref(),
        Some("acc_prd_0000000001")
    );
    assert!(account.bank_information.is_none());
    assert!(account.bank_details_status.is_none());
    assert!(account.stakeholder_id.is_none());
    assert!(account.is_active);
    assert_eq!(account.version, 0);

    Ok(())
}

/// Tests that a second active account for the same user is refused by the index.
///
/// Expected: Err with a unique constraint violation
#[tokio::test]
async fn rejects_second_active_account() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_academy_user(db).await?;

    let repo = PayoutAccountRepository::new(db);
    repo.create(new_account("pa_first", user.id)).await?;
    let result = repo.create(new_account("pa_second", user.id)).await;

    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(crate::server::service::payout_account::is_unique_violation(
        &err
    ));

    Ok(())
}

/// Tests that different users each get their own active account.
///
/// Expected: Ok for both inserts
#[tokio::test]
async fn allows_active_accounts_for_different_users() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let first = factory::create_academy_user(db).await?;
    let second = factory::create_academy_user(db).await?;

    let repo = PayoutAccountRepository::new(db);
    repo.create(new_account("pa_user_one", first.id)).await?;
    let result = repo.create(new_account("pa_user_two", second.id)).await;

    assert!(result.is_ok());

    Ok(())
}
