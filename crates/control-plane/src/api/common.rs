// Common DTOs for public API
//
// These types are shared across the event endpoints.

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::ServiceError;

/// Standard error response for API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message describing what went wrong.
    #[schema(example = "Event (eventId: 42) not found.")]
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Convert to axum response tuple
    pub fn into_response(self, status: StatusCode) -> (StatusCode, Json<Self>) {
        (status, Json(self))
    }
}

impl From<ServiceError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: ServiceError) -> Self {
        let status = match err {
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ErrorResponse::new(err.to_string()).into_response(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_status_mapping() {
        type Rendered = (StatusCode, Json<ErrorResponse>);

        let (status, Json(body)): Rendered =
            ServiceError::BadRequest("Unable to log event.".to_string()).into();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Unable to log event.");

        let (status, _): Rendered = ServiceError::event_not_found(7).into();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, Json(body)): Rendered =
            ServiceError::Internal("pool timed out".to_string()).into();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Server error: pool timed out");
    }
}
