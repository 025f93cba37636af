use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, OpenApi};

use super::{
    dto::{
        ErrorBody, LeakAlertsResponse, ReadingListResponse, SensorReadingDto, ServiceInfo,
        StatusResponse, SubmitReadingRequest, SubmitReadingResponse,
    },
    errors::AppError,
    AppState,
};
use crate::ingest::{validate::parse_limit, ReadingQuery, ValidationError};

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Maximum number of readings (default 100, capped server-side).
    #[param(value_type = Option<u32>)]
    pub limit: Option<String>,
    /// Only readings from this sensor.
    pub sensor_id: Option<String>,
    /// Only readings from this location.
    pub location: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Ingest one pressure reading. `isLeaking` is computed server-side.
#[utoipa::path(
    post,
    path = "/api/sensor-data",
    request_body = SubmitReadingRequest,
    responses(
        (status = 201, description = "Reading stored", body = SubmitReadingResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 500, description = "Persistence error", body = ErrorBody),
    ),
    tag = "readings"
)]
pub async fn submit_reading(
    State(state): State<AppState>,
    payload: Result<Json<SubmitReadingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitReadingResponse>), AppError> {
    let Json(body) =
        payload.map_err(|rej| ValidationError::MalformedBody(rej.body_text()))?;

    let submission = state
        .service
        .submit_reading(body.into())
        .await
        .map_err(|e| state.error(e))?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitReadingResponse {
            message: "Sensor data saved".to_owned(),
            data: submission.reading.into(),
            leak_detected: submission.leak_detected,
        }),
    ))
}

/// List readings, newest first.
#[utoipa::path(
    get,
    path = "/api/sensor-data",
    params(ListParams),
    responses(
        (status = 200, description = "Readings, newest first", body = ReadingListResponse),
        (status = 400, description = "Invalid limit", body = ErrorBody),
        (status = 500, description = "Persistence error", body = ErrorBody),
    ),
    tag = "readings"
)]
pub async fn list_readings(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ReadingListResponse>, AppError> {
    let Query(params) =
        params.map_err(|rej| ValidationError::InvalidQuery(rej.body_text()))?;
    let query = ReadingQuery {
        limit: parse_limit(params.limit.as_deref())?,
        sensor_id: params.sensor_id,
        location: params.location,
    };

    let rows = state
        .service
        .list_readings(query)
        .await
        .map_err(|e| state.error(e))?;

    let results: Vec<SensorReadingDto> = rows.into_iter().map(Into::into).collect();
    Ok(Json(ReadingListResponse {
        count: results.len(),
        results,
    }))
}

/// Leaking readings only, newest first, at most 50.
#[utoipa::path(
    get,
    path = "/api/leak-alerts",
    responses(
        (status = 200, description = "Leak alerts, newest first", body = LeakAlertsResponse),
        (status = 500, description = "Persistence error", body = ErrorBody),
    ),
    tag = "readings"
)]
pub async fn list_leak_alerts(
    State(state): State<AppState>,
) -> Result<Json<LeakAlertsResponse>, AppError> {
    let rows = state
        .service
        .list_leak_alerts()
        .await
        .map_err(|e| state.error(e))?;

    let alerts: Vec<SensorReadingDto> = rows.into_iter().map(Into::into).collect();
    Ok(Json(LeakAlertsResponse {
        alert_count: alerts.len(),
        alerts,
    }))
}

#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Service and database status", body = StatusResponse),
    ),
    tag = "system"
)]
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(state.service.status().await.into())
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = ServiceInfo),
    ),
    tag = "system"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "API Running".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        docs: "/api-docs/openapi.json".to_owned(),
    })
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(submit_reading, list_readings, list_leak_alerts, status, root),
    components(schemas(
        SensorReadingDto,
        SubmitReadingRequest,
        SubmitReadingResponse,
        ReadingListResponse,
        LeakAlertsResponse,
        StatusResponse,
        ServiceInfo,
        ErrorBody,
    )),
    tags(
        (name = "readings", description = "Pressure reading ingestion and queries"),
        (name = "system",   description = "System endpoints"),
    ),
    info(
        title = "Leak Watch API",
        version = "0.1.0",
        description = "Ingests IoT pressure readings and flags leaks above 3.5 bar"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
