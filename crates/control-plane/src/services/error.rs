// Service-level outcomes
//
// The service layer is the only place store failures become client-visible
// outcomes. The HTTP layer maps each variant to a status code.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The caller sent something the store cannot act on
    #[error("{0}")]
    BadRequest(String),

    /// The addressed event does not exist
    #[error("{0}")]
    NotFound(String),

    /// Storage failed (connectivity, constraint violation, driver error)
    #[error("Server error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn event_not_found(id: netmon_core::EventId) -> Self {
        ServiceError::NotFound(format!("Event (eventId: {}) not found.", id))
    }
}
