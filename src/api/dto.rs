use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::models::SensorReading,
    ingest::{RawReading, StatusSnapshot},
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SensorReadingDto {
    pub id: Uuid,
    pub sensor_id: String,
    pub location: String,
    /// Bar
    pub pressure: f64,
    /// `true` when `pressure` is above 3.5 bar.
    pub is_leaking: bool,
    pub timestamp: DateTime<Utc>,
}

impl From<SensorReading> for SensorReadingDto {
    fn from(r: SensorReading) -> Self {
        Self {
            id: r.id,
            sensor_id: r.sensor_id,
            location: r.location,
            pressure: r.pressure,
            is_leaking: r.is_leaking,
            timestamp: r.recorded_at,
        }
    }
}

/// Request body for `POST /api/sensor-data`.
///
/// Fields are kept as raw JSON so the service can report which one is
/// missing or malformed. Unknown fields (including `isLeaking`) are ignored.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReadingRequest {
    #[schema(value_type = Option<String>, example = "S1")]
    pub sensor_id: Option<serde_json::Value>,
    #[schema(value_type = Option<String>, example = "BasementA")]
    pub location: Option<serde_json::Value>,
    /// Bar. A number or a numeric string.
    #[schema(value_type = Option<f64>, example = 4.0)]
    pub pressure: Option<serde_json::Value>,
}

impl From<SubmitReadingRequest> for RawReading {
    fn from(r: SubmitReadingRequest) -> Self {
        Self {
            sensor_id: r.sensor_id,
            location: r.location,
            pressure: r.pressure,
        }
    }
}

/// Response for `POST /api/sensor-data`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReadingResponse {
    pub message: String,
    pub data: SensorReadingDto,
    pub leak_detected: bool,
}

/// Response for `GET /api/sensor-data`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadingListResponse {
    pub count: usize,
    pub results: Vec<SensorReadingDto>,
}

/// Response for `GET /api/leak-alerts`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeakAlertsResponse {
    pub alert_count: usize,
    pub alerts: Vec<SensorReadingDto>,
}

/// Response for `GET /api/status`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// `"operational"`
    pub status: String,
    /// `"connected"` or `"disconnected"`
    pub db_status: String,
    /// Process uptime in seconds.
    pub uptime: f64,
    pub version: String,
}

impl From<StatusSnapshot> for StatusResponse {
    fn from(s: StatusSnapshot) -> Self {
        Self {
            status: if s.operational { "operational" } else { "degraded" }.to_owned(),
            db_status: if s.store_connected { "connected" } else { "disconnected" }.to_owned(),
            uptime: s.uptime.as_secs_f64(),
            version: s.version.to_owned(),
        }
    }
}

/// Response for `GET /`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub docs: String,
}

/// Body of every 4xx/5xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// `"ValidationError"` or `"PersistenceError"`.
    pub error: String,
    pub message: String,
    /// Fields the client must supply (validation errors only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Underlying failure; only present in development-like environments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
