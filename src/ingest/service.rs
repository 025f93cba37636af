use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};

use super::{
    classify,
    validate::{validate, RawReading, ValidationError},
};
use crate::{
    db::models::{NewReading, SensorReading},
    store::{ReadingFilter, ReadingStore, StoreError},
};

/// Default page size for `list_readings`.
pub const DEFAULT_LIST_LIMIT: u32 = 100;
/// Fixed cap for `list_leak_alerts`.
pub const LEAK_ALERT_LIMIT: u32 = 50;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLimits {
    /// Used when the caller gives no limit.
    pub default: u32,
    /// Larger requested limits are clamped to this.
    pub max: u32,
}

impl Default for ListLimits {
    fn default() -> Self {
        Self {
            default: DEFAULT_LIST_LIMIT,
            max: 1000,
        }
    }
}

impl ListLimits {
    fn resolve(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.default).clamp(1, self.max.max(1))
    }
}

/// Query for `list_readings`; every field is optional.
#[derive(Debug, Clone, Default)]
pub struct ReadingQuery {
    pub limit: Option<u32>,
    pub sensor_id: Option<String>,
    pub location: Option<String>,
}

/// Outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub reading: SensorReading,
    pub leak_detected: bool,
}

#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub operational: bool,
    pub store_connected: bool,
    pub uptime: Duration,
    pub version: &'static str,
}

/// Validates, classifies and stores readings, and serves the read views.
///
/// Holds no cache; the store is the single source of truth.
pub struct IngestService {
    store: Arc<dyn ReadingStore>,
    limits: ListLimits,
    started_at: Instant,
}

impl IngestService {
    pub fn new(store: Arc<dyn ReadingStore>, limits: ListLimits) -> Self {
        Self {
            store,
            limits,
            started_at: Instant::now(),
        }
    }

    /// Validate `raw`, recompute `is_leaking` from the pressure, stamp it with
    /// the current time and store it.
    pub async fn submit_reading(&self, raw: RawReading) -> Result<Submission, IngestError> {
        let valid = validate(raw)?;
        let is_leaking = classify(valid.pressure);

        let new = NewReading {
            sensor_id: valid.sensor_id,
            location: valid.location,
            pressure: valid.pressure,
            is_leaking,
            recorded_at: Some(Utc::now()),
        };

        let reading = self.store.insert(new).await.map_err(|e| {
            error!(backend = self.store.backend(), error = %e, "Failed to store sensor reading");
            e
        })?;

        if is_leaking {
            warn!(
                sensor_id = %reading.sensor_id,
                location = %reading.location,
                pressure = reading.pressure,
                "Leak detected"
            );
        } else {
            info!(
                sensor_id = %reading.sensor_id,
                location = %reading.location,
                pressure = reading.pressure,
                "Sensor reading stored"
            );
        }

        Ok(Submission {
            reading,
            leak_detected: is_leaking,
        })
    }

    /// Newest-first readings, optionally narrowed to one sensor or location.
    pub async fn list_readings(&self, query: ReadingQuery) -> Result<Vec<SensorReading>, IngestError> {
        let filter = ReadingFilter {
            sensor_id: query.sensor_id,
            location: query.location,
            is_leaking: None,
        };
        let limit = self.limits.resolve(query.limit);
        Ok(self.store.find_recent(&filter, limit).await?)
    }

    /// Newest-first leaking readings, at most [`LEAK_ALERT_LIMIT`].
    pub async fn list_leak_alerts(&self) -> Result<Vec<SensorReading>, IngestError> {
        Ok(self
            .store
            .find_recent(&ReadingFilter::leaking(), LEAK_ALERT_LIMIT)
            .await?)
    }

    pub async fn status(&self) -> StatusSnapshot {
        let store_connected = match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(backend = self.store.backend(), error = %e, "Store ping failed");
                false
            }
        };

        StatusSnapshot {
            operational: true,
            store_connected,
            uptime: self.started_at.elapsed(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
