use super::*;

/// Tests re-queueing a dead-lettered event.
///
/// Verifies that the attempt counter is reset and the event is due again.
///
/// Expected: Ok(true) with attempts reset and failed_at cleared
#[tokio::test]
async fn requeues_dead_lettered_event() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let repo = OutboxRepository::new(db);
    repo.enqueue(new_event("dead", now - Duration::seconds(60)))
        .await?;
    repo.mark_failed("dead", 5, "gateway down".to_string(), now)
        .await?;

    let requeued = repo.requeue("dead", now).await?;

    assert!(requeued);
    let event = repo.find_by_id("dead").await?.unwrap();
    assert_eq!(event.attempts, 0);
    assert!(event.failed_at.is_none());
    assert_eq!(event.last_error.as_deref(), Some("gateway down"));
    assert_eq!(repo.find_due(now, 50).await?.len(), 1);

    Ok(())
}

/// Tests that queued events can't be re-queued.
///
/// Expected: Ok(false)
#[tokio::test]
async fn ignores_queued_event() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_payout_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let repo = OutboxRepository::new(db);
    repo.enqueue(new_event("queued", now)).await?;

    let requeued = repo.requeue("queued", now).await?;

    assert!(!requeued);

    Ok(())
}
