use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ReadingFilter, ReadingStore, StoreError};
use crate::db::models::{NewReading, SensorReading};

/// In-memory reading store, kept in insertion order.
///
/// Wrapped in `Arc` so it can be cheaply cloned and shared across tasks.
/// Uses `tokio::sync::RwLock` so concurrent readers never block each other.
#[derive(Clone, Default)]
pub struct MemoryReadingStore {
    inner: Arc<RwLock<Vec<SensorReading>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// While offline every operation fails with [`StoreError::Unavailable`],
    /// simulating a lost connection.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ReadingStore for MemoryReadingStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, reading: NewReading) -> Result<SensorReading, StoreError> {
        self.check_online()?;
        let stored = SensorReading {
            id: Uuid::new_v4(),
            sensor_id: reading.sensor_id,
            location: reading.location,
            pressure: reading.pressure,
            is_leaking: reading.is_leaking,
            recorded_at: reading.recorded_at.unwrap_or_else(Utc::now),
        };
        self.inner.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn find_recent(
        &self,
        filter: &ReadingFilter,
        limit: u32,
    ) -> Result<Vec<SensorReading>, StoreError> {
        self.check_online()?;
        let guard = self.inner.read().await;
        // Walk newest insert first so the stable sort keeps later inserts
        // ahead of earlier ones with the same timestamp.
        let mut matching: Vec<SensorReading> = guard
            .iter()
            .rev()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        matching.truncate(limit as usize);
        Ok(matching)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_online()
    }
}
