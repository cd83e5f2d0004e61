// Event domain types
//
// An Event is one connectivity observation: whether the monitor was associated
// with the Wi-Fi network and whether the internet was reachable at that moment.
// Events form a flat log; there are no relations to other entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Event identifier, assigned by the store on creation.
pub type EventId = i32;

/// Maximum length of an event message, in characters.
/// Mirrors the `VARCHAR(255)` column of the events table.
pub const MAX_MESSAGE_CHARS: usize = 255;

/// A stored connectivity event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier assigned by the store.
    #[cfg_attr(feature = "openapi", schema(example = 42))]
    pub id: EventId,
    /// When the observation was made (UTC).
    pub timestamp: DateTime<Utc>,
    /// Whether the monitor was connected to Wi-Fi.
    pub wifi_connected: bool,
    /// Whether the internet was reachable.
    pub internet_connected: bool,
    /// Free-text description of the observation.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(example = "WiFi disconnected"))]
    pub message: Option<String>,
}

impl Event {
    /// True when either connectivity flag is down.
    pub fn is_disconnected(&self) -> bool {
        !self.wifi_connected || !self.internet_connected
    }
}

/// Input for creating or replacing an event.
///
/// A `None` timestamp on create means "now, as observed by the store".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub timestamp: Option<DateTime<Utc>>,
    pub wifi_connected: bool,
    pub internet_connected: bool,
    pub message: Option<String>,
}

impl NewEvent {
    pub fn new(wifi_connected: bool, internet_connected: bool) -> Self {
        Self {
            timestamp: None,
            wifi_connected,
            internet_connected,
            message: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Listing order for events: most recent timestamp first, then highest id first.
pub fn most_recent_first(a: &Event, b: &Event) -> Ordering {
    b.timestamp
        .cmp(&a.timestamp)
        .then_with(|| b.id.cmp(&a.id))
}
