use super::*;

/// Tests re-queueing a dead-lettered event.
///
/// Expected: Ok with the event queued again and the retry audited
#[tokio::test]
async fn requeues_dead_lettered_event() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let admin = factory::user::create_admin_user(db).await?;
    let outbox = OutboxService::new(db);

    let event_id = outbox.enqueue(email_job()).await?;
    OutboxRepository::new(db)
        .mark_failed(&event_id, 5, "gateway down".to_string(), Utc::now())
        .await?;

    let event = outbox
        .retry_event(
            &event_id,
            AuditContext {
                user_id: Some(admin.id),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(event.attempts, 0);
    assert!(event.failed_at.is_none());

    let trail = AuditService::new(db)
        .list_for_entity(OUTBOX_EVENT_ENTITY, &event_id)
        .await?;
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action_type, "outbox_event_requeued");
    assert_eq!(trail[0].user_id, Some(admin.id));

    Ok(())
}

/// Tests re-queueing an event that is still queued.
///
/// Expected: Err(Conflict)
#[tokio::test]
async fn refuses_queued_event() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();
    let outbox = OutboxService::new(db);

    let event_id = outbox.enqueue(email_job()).await?;

    let result = outbox.retry_event(&event_id, AuditContext::system()).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));

    Ok(())
}

/// Tests re-queueing an event that doesn't exist.
///
/// Expected: Err(NotFound)
#[tokio::test]
async fn fails_for_unknown_event() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let result = OutboxService::new(db)
        .retry_event("missing", AuditContext::system())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
