use super::*;

/// Tests selecting accounts for the status poller.
///
/// Verifies that only active accounts still awaiting a decision are returned.
///
/// Expected: Ok with the pending and needs_clarification accounts
#[tokio::test]
async fn returns_active_undecided_accounts() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let mut expected = Vec::new();
    for status in ["pending", "needs_clarification"] {
        let user = factory::create_academy_user(db).await?;
        let account = factory::payout_account::PayoutAccountFactory::new(db, user.id)
            .activation_status(status)
            .build()
            .await?;
        expected.push(account.id);
    }
    for status in ["activated", "rejected"] {
        let user = factory::create_academy_user(db).await?;
        factory::payout_account::PayoutAccountFactory::new(db, user.id)
            .activation_status(status)
            .build()
            .await?;
    }
    let inactive_user = factory::create_academy_user(db).await?;
    factory::payout_account::PayoutAccountFactory::new(db, inactive_user.id)
        .is_active(false)
        .build()
        .await?;

    let repo = PayoutAccountRepository::new(db);
    let mut ids: Vec<String> = repo
        .get_syncable()
        .await?
        .into_iter()
        .map(|account| account.id)
        .collect();
    ids.sort();
    expected.sort();

    assert_eq!(ids, expected);

    Ok(())
}
