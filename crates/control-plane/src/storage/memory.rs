// In-memory storage implementation for dev mode
// Decision: Use parking_lot for thread-safe access
// Decision: Mirror the Postgres semantics (SERIAL ids, microsecond timestamps,
// VARCHAR(255) message) so dev mode and tests behave like production
//
// All data is stored in memory and lost on restart.

use chrono::{SubsecRound, Utc};
use netmon_core::{most_recent_first, Event, EventFilter, EventId, NewEvent, MAX_MESSAGE_CHARS};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};

use super::error::{StoreError, StoreResult};

/// Postgres stores timestamps with microsecond precision.
const TIMESTAMP_PRECISION_DIGITS: u16 = 6;

/// In-memory database for dev mode
#[derive(Default)]
pub struct InMemoryDatabase {
    events: RwLock<HashMap<EventId, Event>>,
    // Last assigned id, like a SERIAL sequence
    event_sequence: AtomicI32,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_message(message: Option<&str>) -> StoreResult<()> {
        match message {
            Some(m) if m.chars().count() > MAX_MESSAGE_CHARS => {
                Err(StoreError::ConstraintViolation(format!(
                    "value too long for type character varying({})",
                    MAX_MESSAGE_CHARS
                )))
            }
            _ => Ok(()),
        }
    }

    // ============================================
    // Events
    // ============================================

    pub async fn list_events(
        &self,
        filter: Option<EventFilter>,
        limit: Option<i64>,
    ) -> StoreResult<Vec<Event>> {
        let events = self.events.read();
        let mut result: Vec<Event> = events
            .values()
            .filter(|e| filter.map_or(true, |f| f.matches(e)))
            .cloned()
            .collect();
        result.sort_by(most_recent_first);

        if let Some(limit) = limit {
            result.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(result)
    }

    pub async fn get_event(&self, id: EventId) -> StoreResult<Option<Event>> {
        Ok(self.events.read().get(&id).cloned())
    }

    pub async fn create_event(&self, input: NewEvent) -> StoreResult<Event> {
        Self::check_message(input.message.as_deref())?;

        let id = self.event_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let timestamp = input
            .timestamp
            .unwrap_or_else(Utc::now)
            .trunc_subsecs(TIMESTAMP_PRECISION_DIGITS);
        let event = Event {
            id,
            timestamp,
            wifi_connected: input.wifi_connected,
            internet_connected: input.internet_connected,
            message: input.message,
        };
        self.events.write().insert(id, event);

        self.get_event(id)
            .await?
            .ok_or(StoreError::MissingAfterWrite(id))
    }

    pub async fn update_event(&self, event: Event) -> StoreResult<Event> {
        let id = event.id;
        {
            let mut events = self.events.write();
            // A missing row wins over a bad value, as with UPDATE ... WHERE id
            let Some(existing) = events.get_mut(&id) else {
                return Err(StoreError::NotFoundOnUpdate(id));
            };
            Self::check_message(event.message.as_deref())?;
            *existing = Event {
                timestamp: event.timestamp.trunc_subsecs(TIMESTAMP_PRECISION_DIGITS),
                ..event
            };
        }

        self.get_event(id)
            .await?
            .ok_or(StoreError::MissingAfterWrite(id))
    }

    pub async fn delete_event(&self, id: EventId) -> StoreResult<u64> {
        Ok(self.events.write().remove(&id).map_or(0, |_| 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[tokio::test]
    async fn test_ids_are_sequential_from_one() {
        let db = InMemoryDatabase::new();
        let first = db.create_event(NewEvent::new(true, true)).await.unwrap();
        let second = db.create_event(NewEvent::new(true, true)).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let db = InMemoryDatabase::new();
        let first = db.create_event(NewEvent::new(true, true)).await.unwrap();
        assert_eq!(db.delete_event(first.id).await.unwrap(), 1);
        let second = db.create_event(NewEvent::new(true, true)).await.unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_timestamps_truncated_to_microseconds() {
        let db = InMemoryDatabase::new();
        let ts = Utc
            .with_ymd_and_hms(2001, 1, 1, 0, 0, 0)
            .unwrap()
            .with_nanosecond(123_456_789)
            .unwrap();
        let created = db
            .create_event(NewEvent::new(true, true).at(ts))
            .await
            .unwrap();
        assert_eq!(created.timestamp.nanosecond(), 123_456_000);
    }

    #[tokio::test]
    async fn test_message_length_constraint() {
        let db = InMemoryDatabase::new();
        let ok = "x".repeat(MAX_MESSAGE_CHARS);
        assert!(db
            .create_event(NewEvent::new(true, true).with_message(ok))
            .await
            .is_ok());

        let too_long = "x".repeat(MAX_MESSAGE_CHARS + 1);
        let err = db
            .create_event(NewEvent::new(true, true).with_message(too_long))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_long_message_and_keeps_row() {
        let db = InMemoryDatabase::new();
        let created = db
            .create_event(NewEvent::new(true, true).with_message("ok"))
            .await
            .unwrap();

        let err = db
            .update_event(Event {
                message: Some("y".repeat(MAX_MESSAGE_CHARS + 1)),
                ..created.clone()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));
        assert_eq!(db.get_event(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_update_unknown_id_with_long_message_is_not_found() {
        let db = InMemoryDatabase::new();
        let err = db
            .update_event(Event {
                id: 404,
                timestamp: Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
                wifi_connected: true,
                internet_connected: true,
                message: Some("x".repeat(MAX_MESSAGE_CHARS + 1)),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFoundOnUpdate(404)));
    }
}
