// Storage layer for the netmon control-plane
// Decision: Support both PostgreSQL (production) and in-memory (dev mode)
//
// - Database: sqlx/Postgres implementation of the events table
// - InMemoryDatabase: HashMap-backed implementation with the same semantics
// - StorageBackend: enum dispatch over both, used by the service layer

pub mod backend;
pub mod error;
pub mod memory;
pub mod models;
pub mod repositories;

pub use backend::StorageBackend;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryDatabase;
pub use models::*;
pub use repositories::*;
