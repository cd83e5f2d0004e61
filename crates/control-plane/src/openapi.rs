// OpenAPI specification generation
//
// This module defines the OpenAPI spec for the network monitor API.
// It is used by both the API server (for Swagger UI) and the
// export-openapi binary (for static spec generation).

use crate::api;
use netmon_core::Event;
use utoipa::OpenApi;

/// OpenAPI documentation for the network monitor API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::events::list_events,
        api::events::list_failed_events,
        api::events::list_wifi_failed_events,
        api::events::list_internet_failed_events,
        api::events::get_event,
        api::events::create_event,
        api::events::create_events,
        api::events::update_event,
        api::events::delete_event,
    ),
    components(
        schemas(
            Event,
            api::events::EventRequest,
            api::events::LimitQuery,
            api::ErrorResponse,
        )
    ),
    tags(
        (name = "events", description = "Connectivity event log endpoints")
    ),
    info(
        title = "Network Monitor API",
        version = "0.1.0",
        description = "API for logging and querying WiFi and internet connectivity events",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> Result<String, serde_json::Error> {
        Self::openapi().to_pretty_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_event_paths() {
        let spec: serde_json::Value = serde_json::from_str(&ApiDoc::to_json().unwrap()).unwrap();
        let paths = spec["paths"].as_object().unwrap();

        for path in [
            "/api/events",
            "/api/events/multiple",
            "/api/events/failed",
            "/api/events/failed/wifi",
            "/api/events/failed/internet",
            "/api/events/{id}",
        ] {
            assert!(paths.contains_key(path), "missing path {}", path);
        }
        assert!(paths["/api/events/{id}"]["put"].is_object());
        assert!(spec["components"]["schemas"]["EventRequest"].is_object());
        assert!(spec["components"]["schemas"].get("EventFilter").is_none());
    }
}
