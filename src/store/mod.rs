//! Durable collection of sensor readings.
//!
//! The ingest service talks to storage only through [`ReadingStore`], so the
//! Postgres backend can be swapped for the in-memory one in tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::db::models::{NewReading, SensorReading};

pub use memory::MemoryReadingStore;
pub use postgres::PgReadingStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Equality filter applied by [`ReadingStore::find_recent`]. `None` fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingFilter {
    pub sensor_id: Option<String>,
    pub location: Option<String>,
    pub is_leaking: Option<bool>,
}

impl ReadingFilter {
    pub fn leaking() -> Self {
        Self {
            is_leaking: Some(true),
            ..Self::default()
        }
    }

    pub fn matches(&self, reading: &SensorReading) -> bool {
        self.sensor_id.as_deref().is_none_or(|id| id == reading.sensor_id)
            && self.location.as_deref().is_none_or(|loc| loc == reading.location)
            && self.is_leaking.is_none_or(|leaking| leaking == reading.is_leaking)
    }
}

#[async_trait]
pub trait ReadingStore: Send + Sync + 'static {
    /// Short tag used in logs, e.g. `"postgres"`.
    fn backend(&self) -> &'static str;

    /// Persist one reading, assigning its id and (if missing) its timestamp.
    async fn insert(&self, reading: NewReading) -> Result<SensorReading, StoreError>;

    /// Readings matching `filter`, newest first, at most `limit` of them.
    async fn find_recent(
        &self,
        filter: &ReadingFilter,
        limit: u32,
    ) -> Result<Vec<SensorReading>, StoreError>;

    /// Cheap connectivity probe.
    async fn ping(&self) -> Result<(), StoreError>;
}
