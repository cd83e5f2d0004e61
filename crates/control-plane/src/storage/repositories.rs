// Repository layer for database operations
// Events table: one row per connectivity observation

use netmon_core::{Event, EventFilter, EventId, NewEvent};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use super::error::{StoreError, StoreResult};
use super::models::EventRow;

/// Idempotent DDL for the events table.
pub const EVENTS_SCHEMA: &str = include_str!("../../schema/events.sql");

/// Connection pool settings
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str, settings: &PoolSettings) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the events table and its index if they do not exist yet
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::raw_sql(EVENTS_SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    // ============================================
    // Events
    // ============================================

    /// List events most recent first. `limit` of `None` returns every row
    /// (Postgres treats `LIMIT NULL` as `LIMIT ALL`).
    pub async fn list_events(
        &self,
        filter: Option<EventFilter>,
        limit: Option<i64>,
    ) -> StoreResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(list_events_sql(filter))
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    pub async fn get_event(&self, id: EventId) -> StoreResult<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, timestamp, wifi_connected, internet_connected, message
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Event::from))
    }

    /// Insert an event and read it back. A missing timestamp becomes the
    /// database's current time.
    pub async fn create_event(&self, input: NewEvent) -> StoreResult<Event> {
        let id: EventId = sqlx::query_scalar(
            r#"
            INSERT INTO events (timestamp, wifi_connected, internet_connected, message)
            VALUES (COALESCE($1, NOW()), $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(input.timestamp)
        .bind(input.wifi_connected)
        .bind(input.internet_connected)
        .bind(&input.message)
        .fetch_one(&self.pool)
        .await?;

        self.get_event(id)
            .await?
            .ok_or(StoreError::MissingAfterWrite(id))
    }

    /// Replace every column of an existing event and read it back.
    pub async fn update_event(&self, event: Event) -> StoreResult<Event> {
        let result = sqlx::query(
            r#"
            UPDATE events
            SET
                timestamp = $2,
                wifi_connected = $3,
                internet_connected = $4,
                message = $5
            WHERE id = $1
            "#,
        )
        .bind(event.id)
        .bind(event.timestamp)
        .bind(event.wifi_connected)
        .bind(event.internet_connected)
        .bind(&event.message)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFoundOnUpdate(event.id));
        }

        self.get_event(event.id)
            .await?
            .ok_or(StoreError::MissingAfterWrite(event.id))
    }

    pub async fn delete_event(&self, id: EventId) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// One static statement per view keeps every query fully parameterized.
fn list_events_sql(filter: Option<EventFilter>) -> &'static str {
    match filter {
        None => {
            r#"
            SELECT id, timestamp, wifi_connected, internet_connected, message
            FROM events
            ORDER BY timestamp DESC, id DESC
            LIMIT $1
            "#
        }
        Some(EventFilter::Disconnected) => {
            r#"
            SELECT id, timestamp, wifi_connected, internet_connected, message
            FROM events
            WHERE NOT wifi_connected OR NOT internet_connected
            ORDER BY timestamp DESC, id DESC
            LIMIT $1
            "#
        }
        Some(EventFilter::WifiDisconnected) => {
            r#"
            SELECT id, timestamp, wifi_connected, internet_connected, message
            FROM events
            WHERE NOT wifi_connected
            ORDER BY timestamp DESC, id DESC
            LIMIT $1
            "#
        }
        Some(EventFilter::InternetDisconnected) => {
            r#"
            SELECT id, timestamp, wifi_connected, internet_connected, message
            FROM events
            WHERE NOT internet_connected
            ORDER BY timestamp DESC, id DESC
            LIMIT $1
            "#
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_sql_orders_and_limits_every_view() {
        let views = std::iter::once(None).chain(EventFilter::ALL.into_iter().map(Some));
        for filter in views {
            let sql = list_events_sql(filter);
            assert!(sql.contains("ORDER BY timestamp DESC, id DESC"), "{filter:?}");
            assert!(sql.contains("LIMIT $1"), "{filter:?}");
        }
    }

    #[test]
    fn test_list_sql_where_clauses() {
        assert!(!list_events_sql(None).contains("WHERE"));
        assert!(list_events_sql(Some(EventFilter::Disconnected))
            .contains("NOT wifi_connected OR NOT internet_connected"));
        assert!(list_events_sql(Some(EventFilter::WifiDisconnected)).contains("WHERE NOT wifi_connected"));
        assert!(list_events_sql(Some(EventFilter::InternetDisconnected))
            .contains("WHERE NOT internet_connected"));
    }

    #[test]
    fn test_schema_declares_message_limit() {
        assert!(EVENTS_SCHEMA.contains("CREATE TABLE IF NOT EXISTS events"));
        assert!(EVENTS_SCHEMA.contains("message VARCHAR(255)"));
    }
}
