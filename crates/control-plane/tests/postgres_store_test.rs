// Postgres store integration tests
// Run with: cargo test -p netmon-control-plane --test postgres_store_test -- --ignored --test-threads=1
// Requires: DATABASE_URL pointing at a disposable database (the events table is truncated)

use chrono::{TimeZone, Utc};
use netmon_control_plane::storage::{Database, PoolSettings, StorageBackend, StoreError};
use netmon_core::{Event, EventFilter, NewEvent, MAX_MESSAGE_CHARS};

async fn store() -> StorageBackend {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = Database::from_url(&url, &PoolSettings::default())
        .await
        .expect("Failed to connect to database");
    db.ensure_schema().await.expect("Failed to create schema");
    sqlx::query("TRUNCATE events RESTART IDENTITY")
        .execute(db.pool())
        .await
        .expect("Failed to truncate events");
    StorageBackend::Postgres(db)
}

fn at(year: i32, month: u32, day: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

async fn seed(store: &StorageBackend) -> Vec<Event> {
    store
        .create_events(vec![
            NewEvent::new(true, true).at(at(2000, 1, 1)),
            NewEvent::new(false, true).at(at(2000, 2, 2)),
            NewEvent::new(true, false).at(at(2000, 3, 3)),
        ])
        .await
        .unwrap()
}

#[tokio::test]
#[ignore]
async fn test_list_ordering_and_limits() {
    let store = store().await;
    let created = seed(&store).await;
    assert_eq!(created.len(), 3);

    let all = store.list_all().await.unwrap();
    let stamps: Vec<_> = all.iter().map(|e| e.timestamp).collect();
    assert_eq!(stamps, vec![at(2000, 3, 3), at(2000, 2, 2), at(2000, 1, 1)]);

    assert_eq!(store.list_limited(0).await.unwrap(), all);
    assert_eq!(store.list_limited(-5).await.unwrap(), all);
    assert_eq!(store.list_limited(2).await.unwrap(), all[..2].to_vec());
    assert_eq!(store.list_limited(10).await.unwrap(), all);
}

#[tokio::test]
#[ignore]
async fn test_filters() {
    let store = store().await;
    seed(&store).await;

    let failed = store
        .list_filtered(EventFilter::Disconnected, 0)
        .await
        .unwrap();
    assert_eq!(failed.len(), 2);
    assert_eq!(failed[0].timestamp, at(2000, 3, 3));

    let wifi = store
        .list_filtered(EventFilter::WifiDisconnected, 0)
        .await
        .unwrap();
    assert_eq!(wifi.len(), 1);
    assert_eq!(wifi[0].timestamp, at(2000, 2, 2));

    let internet = store
        .list_filtered(EventFilter::InternetDisconnected, 1)
        .await
        .unwrap();
    assert_eq!(internet.len(), 1);
    assert_eq!(internet[0].timestamp, at(2000, 3, 3));
}

#[tokio::test]
#[ignore]
async fn test_create_defaults_timestamp_and_round_trips() {
    let store = store().await;
    let before = Utc::now() - chrono::Duration::seconds(5);

    let created = store
        .create_event(NewEvent::new(false, false).with_message("both down"))
        .await
        .unwrap();
    assert!(created.timestamp >= before);
    assert_eq!(created.message.as_deref(), Some("both down"));

    let fetched = store.get_event(created.id).await.unwrap();
    assert_eq!(fetched, Some(created));
}

#[tokio::test]
#[ignore]
async fn test_update_and_delete() {
    let store = store().await;
    let created = seed(&store).await;
    let target = created[0].clone();

    let updated = store
        .update_event(Event {
            timestamp: at(2010, 1, 1),
            wifi_connected: false,
            message: None,
            ..target.clone()
        })
        .await
        .unwrap();
    assert_eq!(updated.id, target.id);
    assert_eq!(updated.timestamp, at(2010, 1, 1));
    assert!(!updated.wifi_connected);

    let err = store
        .update_event(Event {
            id: 9999,
            ..target.clone()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFoundOnUpdate(9999)));

    assert_eq!(store.delete_event(target.id).await.unwrap(), 1);
    assert_eq!(store.delete_event(target.id).await.unwrap(), 0);
    assert_eq!(store.get_event(target.id).await.unwrap(), None);
}

#[tokio::test]
#[ignore]
async fn test_batch_failure_keeps_earlier_rows() {
    let store = store().await;

    let err = store
        .create_events(vec![
            NewEvent::new(true, true).at(at(2000, 1, 1)),
            NewEvent::new(true, true).with_message("x".repeat(MAX_MESSAGE_CHARS + 1)),
            NewEvent::new(true, true).at(at(2000, 3, 3)),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ConstraintViolation(_)));

    let remaining = store.list_all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].timestamp, at(2000, 1, 1));
}
