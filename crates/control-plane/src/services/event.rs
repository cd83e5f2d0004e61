// Event service: the single translation point from store outcomes to
// client-visible outcomes.
//
// Decision: An absent limit resolves to 0, which lists everything
// Decision: Unknown store failures are logged here and surfaced as Internal

use crate::storage::{StorageBackend, StoreError};
use netmon_core::{Event, EventFilter, EventId};
use std::sync::Arc;
use tracing::Instrument;

use super::error::ServiceError;
use super::validation::{validate_new_event, validate_new_events, validate_replacement};
use crate::api::events::EventRequest;

/// Limit used when the caller does not send one (unlimited)
pub const DEFAULT_LIST_LIMIT: i64 = 0;

pub struct EventService {
    store: Arc<StorageBackend>,
}

impl EventService {
    pub fn new(store: Arc<StorageBackend>) -> Self {
        Self { store }
    }

    /// List events, optionally filtered, most recent first
    pub async fn list(
        &self,
        filter: Option<EventFilter>,
        limit: Option<i64>,
    ) -> Result<Vec<Event>, ServiceError> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        let result = match filter {
            Some(filter) => self.store.list_filtered(filter, limit).await,
            None => self.store.list_limited(limit).await,
        };

        let events = result.map_err(|e| internal("list events", e))?;
        tracing::debug!(filter = ?filter, limit, count = events.len(), "Listed events");
        Ok(events)
    }

    pub async fn get(&self, id: EventId) -> Result<Event, ServiceError> {
        self.store
            .get_event(id)
            .await
            .map_err(|e| internal("get event", e))?
            .ok_or_else(|| ServiceError::event_not_found(id))
    }

    pub async fn create(&self, req: EventRequest) -> Result<Event, ServiceError> {
        let input = validate_new_event(req).map_err(|e| ServiceError::BadRequest(e.0))?;

        let span = tracing::info_span!(
            "events.create",
            wifi_connected = input.wifi_connected,
            internet_connected = input.internet_connected,
        );
        async move {
            let event = self.store.create_event(input).await.map_err(create_error)?;
            tracing::info!(event_id = event.id, "Logged event");
            Ok(event)
        }
        .instrument(span)
        .await
    }

    /// Create a batch in input order. The whole batch is validated first;
    /// a store failure part-way leaves the earlier events committed.
    pub async fn create_many(&self, reqs: Vec<EventRequest>) -> Result<Vec<Event>, ServiceError> {
        let inputs = validate_new_events(reqs).map_err(|e| ServiceError::BadRequest(e.0))?;

        let span = tracing::info_span!("events.create_many", count = inputs.len());
        async move {
            let events = self
                .store
                .create_events(inputs)
                .await
                .map_err(create_many_error)?;
            tracing::info!(count = events.len(), "Logged events");
            Ok(events)
        }
        .instrument(span)
        .await
    }

    /// Replace every field of event `id`
    pub async fn update(&self, id: EventId, req: EventRequest) -> Result<Event, ServiceError> {
        let event = validate_replacement(id, req).map_err(|e| ServiceError::BadRequest(e.0))?;

        let updated = self.store.update_event(event).await.map_err(update_error)?;
        tracing::info!(event_id = id, "Updated event");
        Ok(updated)
    }

    pub async fn delete(&self, id: EventId) -> Result<(), ServiceError> {
        let removed = self
            .store
            .delete_event(id)
            .await
            .map_err(|e| internal("delete event", e))?;

        if removed == 0 {
            return Err(ServiceError::event_not_found(id));
        }
        tracing::info!(event_id = id, "Deleted event");
        Ok(())
    }
}

fn create_error(e: StoreError) -> ServiceError {
    match e {
        StoreError::MissingAfterWrite(_) => {
            ServiceError::BadRequest("Unable to log event.".to_string())
        }
        e => internal("create event", e),
    }
}

fn create_many_error(e: StoreError) -> ServiceError {
    match e {
        StoreError::MissingAfterWrite(_) => {
            ServiceError::BadRequest("Unable to log events.".to_string())
        }
        e => internal("create events", e),
    }
}

fn update_error(e: StoreError) -> ServiceError {
    match e {
        // A concurrent delete between the write and the re-read looks
        // the same to the caller as updating a missing id
        StoreError::NotFoundOnUpdate(id) | StoreError::MissingAfterWrite(id) => {
            ServiceError::BadRequest(format!("Event (eventId: {}) not found.", id))
        }
        e => internal("update event", e),
    }
}

fn internal(action: &str, e: StoreError) -> ServiceError {
    tracing::error!(connectivity = e.is_connectivity(), "Failed to {}: {}", action, e);
    ServiceError::Internal(e.to_string())
}
