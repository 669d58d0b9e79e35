use super::*;

/// Tests appending an audit entry.
///
/// Verifies that the action, scale, entity reference, metadata and request context are
/// all stored.
///
/// Expected: Ok with the stored record
#[tokio::test]
async fn creates_audit_entry() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = AuditTrailRepository::new(db);
    let record = repo
        .create(AuditEntry::payout_account(
            AuditAction::PayoutAccountCreated,
            "pa_audit",
            "Payout account created",
            json!({ "business_type": "individual" }),
            AuditContext {
                user_id: Some(7),
                ip_address: Some("203.0.113.9".to_string()),
                user_agent: Some("academy-app/2.1".to_string()),
            },
        ))
        .await?;

    assert_eq!(record.action_type, "payout_account_created");
    assert_eq!(record.scale, "high");
    assert_eq!(record.entity_type, "payout_account");
    assert_eq!(record.entity_id, "pa_audit");
    assert_eq!(record.user_id, Some(7));
    assert_eq!(record.metadata, json!({ "business_type": "individual" }));
    assert_eq!(record.ip_address.as_deref(), Some("203.0.113.9"));
    assert_eq!(record.user_agent.as_deref(), Some("academy-app/2.1"));

    Ok(())
}
