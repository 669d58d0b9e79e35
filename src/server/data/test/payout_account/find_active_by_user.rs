use super::*;

/// Tests finding the active account among inactive ones.
///
/// Expected: Ok(Some) with the active account
#[tokio::test]
async fn finds_active_account() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_academy_user(db).await?;
    factory::payout_account::PayoutAccountFactory::new(db, user.id)
        .is_active(false)
        .build()
        .await?;
    let active = factory::create_payout_account(db, user.id).await?;

    let repo = PayoutAccountRepository::new(db);
    let account = repo.find_active_by_user(user.id).await?;

    assert!(account.is_some());
    assert_eq!(account.unwrap().id, active.id);

    Ok(())
}

/// Tests that a user with only inactive accounts has no active account.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_without_active_account() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_academy_user(db).await?;
    factory::payout_account::PayoutAccountFactory::new(db, user.id)
        .is_active(false)
        .build()
        .await?;

    let repo = PayoutAccountRepository::new(db);
    let account = repo.find_active_by_user(user.id).await?;

    assert!(account.is_none());

    Ok(())
}
