// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, Utc};
use netmon_core::{Event, EventId};
use sqlx::FromRow;

// ============================================
// Event models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    pub wifi_connected: bool,
    pub internet_connected: bool,
    pub message: Option<String>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            timestamp: row.timestamp,
            wifi_connected: row.wifi_connected,
            internet_connected: row.internet_connected,
            message: row.message,
        }
    }
}
