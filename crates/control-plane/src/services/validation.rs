// Input validation for event APIs
//
// Shape checks run before anything reaches the store: both connectivity
// flags must be present, and replacements must carry a timestamp.
// Batch size is capped as a last-resort guard against abuse.

use chrono::{DateTime, Utc};
use netmon_core::{Event, EventId, NewEvent};

use crate::api::events::EventRequest;

/// Maximum number of events accepted by one batch create.
/// The field monitor buffers at most 180 events between uploads.
pub const MAX_BATCH_EVENTS: usize = 1000;

/// Validation error with a client-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl ValidationError {
    fn in_batch(self, index: usize) -> Self {
        ValidationError(format!("events[{}]: {}", index, self.0))
    }
}

fn require_flag(value: Option<bool>, field: &str) -> Result<bool, ValidationError> {
    value.ok_or_else(|| {
        tracing::warn!(field, "Rejected event without connectivity flag");
        ValidationError(format!("'{}' must be a boolean", field))
    })
}

fn require_timestamp(value: Option<DateTime<Utc>>) -> Result<DateTime<Utc>, ValidationError> {
    value.ok_or_else(|| {
        tracing::warn!("Rejected event replacement without timestamp");
        ValidationError("'timestamp' is required".to_string())
    })
}

/// Validate a create request. Any client-supplied id is discarded.
pub fn validate_new_event(req: EventRequest) -> Result<NewEvent, ValidationError> {
    if let Some(id) = req.id {
        tracing::debug!(id, "Ignoring client-supplied id on create");
    }

    Ok(NewEvent {
        timestamp: req.timestamp,
        wifi_connected: require_flag(req.wifi_connected, "wifiConnected")?,
        internet_connected: require_flag(req.internet_connected, "internetConnected")?,
        message: req.message,
    })
}

/// Validate every element of a batch before any of it is written
pub fn validate_new_events(reqs: Vec<EventRequest>) -> Result<Vec<NewEvent>, ValidationError> {
    if reqs.len() > MAX_BATCH_EVENTS {
        tracing::warn!(
            "Event batch exceeds limit: {} events (max: {})",
            reqs.len(),
            MAX_BATCH_EVENTS
        );
        return Err(ValidationError(format!(
            "Batch exceeds {} events",
            MAX_BATCH_EVENTS
        )));
    }

    reqs.into_iter()
        .enumerate()
        .map(|(index, req)| validate_new_event(req).map_err(|e| e.in_batch(index)))
        .collect()
}

/// Validate a full replacement. The path id wins over any id in the body.
pub fn validate_replacement(id: EventId, req: EventRequest) -> Result<Event, ValidationError> {
    if let Some(body_id) = req.id.filter(|body_id| *body_id != id) {
        tracing::debug!(path_id = id, body_id, "Overriding body id with path id");
    }

    Ok(Event {
        id,
        timestamp: require_timestamp(req.timestamp)?,
        wifi_connected: require_flag(req.wifi_connected, "wifiConnected")?,
        internet_connected: require_flag(req.internet_connected, "internetConnected")?,
        message: req.message,
    })
}
