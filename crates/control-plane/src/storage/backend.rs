// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// StorageBackend is the event store used by the service layer. It works with
// either PostgreSQL (production) or in-memory (dev mode) storage, and owns the
// operation-level semantics shared by both: limit normalization, ordering and
// sequential batch creation.

use netmon_core::{effective_limit, Event, EventFilter, EventId, NewEvent};
use std::sync::Arc;

use super::error::StoreResult;
use super::memory::InMemoryDatabase;
use super::repositories::{Database, PoolSettings};

/// Storage backend that can be either PostgreSQL or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// PostgreSQL database (production)
    Postgres(Database),
    /// In-memory database (dev mode)
    InMemory(Arc<InMemoryDatabase>),
}

impl StorageBackend {
    /// Create a PostgreSQL storage backend from a database URL
    pub async fn postgres(database_url: &str, settings: &PoolSettings) -> StoreResult<Self> {
        let db = Database::from_url(database_url, settings).await?;
        Ok(Self::Postgres(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryDatabase::new()))
    }

    /// Short name of the backend, reported by the health endpoint
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::InMemory(_) => "memory",
        }
    }

    // ============================================
    // Listing
    // ============================================

    /// Every event, most recent first
    pub async fn list_all(&self) -> StoreResult<Vec<Event>> {
        self.list_events(None, None).await
    }

    /// The most recent `limit` events; `limit <= 0` lists everything
    pub async fn list_limited(&self, limit: i64) -> StoreResult<Vec<Event>> {
        self.list_events(None, effective_limit(limit)).await
    }

    /// Events matching `filter`, with the same limit semantics as `list_limited`
    pub async fn list_filtered(&self, filter: EventFilter, limit: i64) -> StoreResult<Vec<Event>> {
        self.list_events(Some(filter), effective_limit(limit)).await
    }

    async fn list_events(
        &self,
        filter: Option<EventFilter>,
        limit: Option<i64>,
    ) -> StoreResult<Vec<Event>> {
        match self {
            Self::Postgres(db) => db.list_events(filter, limit).await,
            Self::InMemory(db) => db.list_events(filter, limit).await,
        }
    }

    // ============================================
    // Single-event operations
    // ============================================

    pub async fn get_event(&self, id: EventId) -> StoreResult<Option<Event>> {
        match self {
            Self::Postgres(db) => db.get_event(id).await,
            Self::InMemory(db) => db.get_event(id).await,
        }
    }

    pub async fn create_event(&self, input: NewEvent) -> StoreResult<Event> {
        match self {
            Self::Postgres(db) => db.create_event(input).await,
            Self::InMemory(db) => db.create_event(input).await,
        }
    }

    /// Create events one at a time, in input order.
    ///
    /// Not transactional: the first failure aborts the batch and the events
    /// created before it stay committed.
    pub async fn create_events(&self, inputs: Vec<NewEvent>) -> StoreResult<Vec<Event>> {
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            created.push(self.create_event(input).await?);
        }
        Ok(created)
    }

    /// Replace all fields of the event with `event.id`
    pub async fn update_event(&self, event: Event) -> StoreResult<Event> {
        match self {
            Self::Postgres(db) => db.update_event(event).await,
            Self::InMemory(db) => db.update_event(event).await,
        }
    }

    /// Number of rows removed (0 when nothing matched)
    pub async fn delete_event(&self, id: EventId) -> StoreResult<u64> {
        match self {
            Self::Postgres(db) => db.delete_event(id).await,
            Self::InMemory(db) => db.delete_event(id).await,
        }
    }
}
