// Connectivity event CRUD HTTP routes
//
// Responses are bare JSON arrays/objects; failures carry an ErrorResponse.

use crate::storage::StorageBackend;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use netmon_core::{timestamp, Event, EventFilter, EventId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use super::common::ErrorResponse;
use crate::services::EventService;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Event payload for create and update.
///
/// Both connectivity flags are required. On create the timestamp defaults to
/// the server's current time; on update it is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    /// Ignored on create. On update the path id is used instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EventId>,
    /// RFC 3339 timestamp. A value without an offset is read as UTC.
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>, example = "2024-05-01T12:00:00Z")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Whether the monitor was associated with a WiFi network.
    #[serde(default)]
    #[schema(example = true)]
    pub wifi_connected: Option<bool>,
    /// Whether the monitor could reach the internet.
    #[serde(default)]
    #[schema(example = false)]
    pub internet_connected: Option<bool>,
    /// Free-form note, at most 255 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Internet connection lost")]
    pub message: Option<String>,
}

/// Query parameters for event listing
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct LimitQuery {
    /// Maximum number of events, most recent first. 0, negative, or absent means all.
    pub limit: Option<i64>,
}

// ============================================
// App State and Routes
// ============================================

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventService>,
}

impl AppState {
    pub fn new(store: Arc<StorageBackend>) -> Self {
        Self {
            service: Arc::new(EventService::new(store)),
        }
    }
}

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/multiple", post(create_events))
        .route("/api/events/failed", get(list_failed_events))
        .route("/api/events/failed/wifi", get(list_wifi_failed_events))
        .route(
            "/api/events/failed/internet",
            get(list_internet_failed_events),
        )
        .route(
            "/api/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .with_state(state)
}

/// Malformed JSON (bad syntax, wrong types, unparseable timestamp) is a 400
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::warn!("Rejected event payload: {}", rejection.body_text());
        ErrorResponse::new(rejection.body_text()).into_response(StatusCode::BAD_REQUEST)
    })
}

async fn list(
    state: &AppState,
    filter: Option<EventFilter>,
    query: LimitQuery,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = state.service.list(filter, query.limit).await?;
    Ok(Json(events))
}

// ============================================
// HTTP Handlers
// ============================================

/// GET /api/events - List events, most recent first
#[utoipa::path(
    get,
    path = "/api/events",
    params(LimitQuery),
    responses(
        (status = 200, description = "Events, most recent first", body = Vec<Event>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    list(&state, None, query).await
}

/// GET /api/events/failed - Events where WiFi or internet was down
#[utoipa::path(
    get,
    path = "/api/events/failed",
    params(LimitQuery),
    responses(
        (status = 200, description = "Disconnected events, most recent first", body = Vec<Event>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn list_failed_events(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    list(&state, Some(EventFilter::Disconnected), query).await
}

/// GET /api/events/failed/wifi - Events where WiFi was down
#[utoipa::path(
    get,
    path = "/api/events/failed/wifi",
    params(LimitQuery),
    responses(
        (status = 200, description = "WiFi-disconnected events, most recent first", body = Vec<Event>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn list_wifi_failed_events(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    list(&state, Some(EventFilter::WifiDisconnected), query).await
}

/// GET /api/events/failed/internet - Events where the internet was unreachable
#[utoipa::path(
    get,
    path = "/api/events/failed/internet",
    params(LimitQuery),
    responses(
        (status = 200, description = "Internet-disconnected events, most recent first", body = Vec<Event>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn list_internet_failed_events(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    list(&state, Some(EventFilter::InternetDisconnected), query).await
}

/// GET /api/events/{id} - Get event by ID
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(
        ("id" = i32, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
) -> Result<Json<Event>, ApiError> {
    let event = state.service.get(id).await?;
    Ok(Json(event))
}

/// POST /api/events - Log one event
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = EventRequest,
    responses(
        (status = 201, description = "Event logged", body = Event),
        (status = 400, description = "Invalid event", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<EventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let req = json_body(payload)?;
    let event = state.service.create(req).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// POST /api/events/multiple - Log a batch of events in order
#[utoipa::path(
    post,
    path = "/api/events/multiple",
    request_body = Vec<EventRequest>,
    responses(
        (status = 201, description = "Events logged, in request order", body = Vec<Event>),
        (status = 400, description = "Invalid event in batch", body = ErrorResponse),
        (status = 500, description = "Internal server error; earlier events may be stored", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn create_events(
    State(state): State<AppState>,
    payload: Result<Json<Vec<EventRequest>>, JsonRejection>,
) -> Result<(StatusCode, Json<Vec<Event>>), ApiError> {
    let reqs = json_body(payload)?;
    let events = state.service.create_many(reqs).await?;
    Ok((StatusCode::CREATED, Json(events)))
}

/// PUT /api/events/{id} - Replace an event
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(
        ("id" = i32, Path, description = "Event ID")
    ),
    request_body = EventRequest,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, description = "Invalid event or unknown ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
    payload: Result<Json<EventRequest>, JsonRejection>,
) -> Result<Json<Event>, ApiError> {
    let req = json_body(payload)?;
    let event = state.service.update(id, req).await?;
    Ok(Json(event))
}

/// DELETE /api/events/{id} - Delete an event
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(
        ("id" = i32, Path, description = "Event ID")
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<EventId>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
