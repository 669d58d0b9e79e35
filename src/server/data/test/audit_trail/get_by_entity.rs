use super::*;

/// Tests reading an entity's trail.
///
/// Verifies that only the entity's own entries are returned, oldest first.
///
/// Expected: Ok with both entries for the account in insertion order
#[tokio::test]
async fn returns_entries_for_entity_in_order() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = AuditTrailRepository::new(db);
    for (action, id) in [
        (AuditAction::PayoutAccountCreated, "pa_trail"),
        (AuditAction::PayoutAccountCreated, "pa_other"),
        (AuditAction::PayoutStatusChanged, "pa_trail"),
    ] {
        repo.create(AuditEntry::payout_account(
            action,
            id,
            "entry",
            json!({}),
            AuditContext::system(),
        ))
        .await?;
    }

    let actions: Vec<String> = repo
        .get_by_entity("payout_account", "pa_trail")
        .await?
        .into_iter()
        .map(|record| record.action_type)
        .collect();

    assert_eq!(
        actions,
        vec![
            "payout_account_created".to_string(),
            "payout_status_changed".to_string()
        ]
    );

    Ok(())
}
