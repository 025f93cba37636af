use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted pressure reading. Rows are never updated after insert.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct SensorReading {
    pub id: Uuid,
    pub sensor_id: String,
    pub location: String,
    /// Bar
    pub pressure: f64,
    /// Always derived from `pressure` at ingest time.
    pub is_leaking: bool,
    pub recorded_at: DateTime<Utc>,
}

/// A validated, classified reading that has not been stored yet.
///
/// `recorded_at = None` lets the store assign its own creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub sensor_id: String,
    pub location: String,
    pub pressure: f64,
    pub is_leaking: bool,
    pub recorded_at: Option<DateTime<Utc>>,
}
