use async_trait::async_trait;
use sqlx::PgPool;

use super::{ReadingFilter, ReadingStore, StoreError};
use crate::db::models::{NewReading, SensorReading};

/// Postgres-backed store over the `sensor_readings` table.
#[derive(Clone)]
pub struct PgReadingStore {
    pool: PgPool,
}

impl PgReadingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadingStore for PgReadingStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, reading: NewReading) -> Result<SensorReading, StoreError> {
        let row = sqlx::query_as::<_, SensorReading>(
            r#"
            INSERT INTO sensor_readings (sensor_id, location, pressure, is_leaking, recorded_at)
            VALUES ($1, $2, $3, $4, COALESCE($5, now()))
            RETURNING id, sensor_id, location, pressure, is_leaking, recorded_at
            "#,
        )
        .bind(&reading.sensor_id)
        .bind(&reading.location)
        .bind(reading.pressure)
        .bind(reading.is_leaking)
        .bind(reading.recorded_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_recent(
        &self,
        filter: &ReadingFilter,
        limit: u32,
    ) -> Result<Vec<SensorReading>, StoreError> {
        let rows = sqlx::query_as::<_, SensorReading>(
            r#"
            SELECT id, sensor_id, location, pressure, is_leaking, recorded_at
            FROM sensor_readings
            WHERE ($1::text    IS NULL OR sensor_id  = $1)
              AND ($2::text    IS NULL OR location   = $2)
              AND ($3::boolean IS NULL OR is_leaking = $3)
            ORDER BY recorded_at DESC
            LIMIT $4
            "#,
        )
        .bind(filter.sensor_id.as_deref())
        .bind(filter.location.as_deref())
        .bind(filter.is_leaking)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests (need a live Postgres via DATABASE_URL: `cargo test -- --ignored`)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sqlx::PgPool;

    use super::*;

    fn new_reading(sensor_id: &str, location: &str, pressure: f64) -> NewReading {
        NewReading {
            sensor_id: sensor_id.to_owned(),
            location: location.to_owned(),
            pressure,
            is_leaking: pressure > 3.5,
            recorded_at: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn insert_returns_generated_id_and_timestamp(pool: PgPool) {
        let store = PgReadingStore::new(pool);
        let before = Utc::now() - Duration::seconds(5);

        let stored = store.insert(new_reading("S1", "BasementA", 4.0)).await.unwrap();

        assert_eq!(stored.sensor_id, "S1");
        assert_eq!(stored.location, "BasementA");
        assert!(stored.is_leaking);
        assert!(stored.recorded_at >= before);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn find_recent_orders_newest_first(pool: PgPool) {
        let store = PgReadingStore::new(pool);
        let t0 = Utc::now();
        for (id, offset) in [("t1", 1), ("t3", 3), ("t2", 2)] {
            let mut r = new_reading(id, "Kitchen", 1.0);
            r.recorded_at = Some(t0 + Duration::seconds(offset));
            store.insert(r).await.unwrap();
        }

        let rows = store.find_recent(&ReadingFilter::default(), 100).await.unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.sensor_id.as_str()).collect();
        assert_eq!(ids, ["t3", "t2", "t1"]);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn find_recent_filters_and_limits(pool: PgPool) {
        let store = PgReadingStore::new(pool);
        for i in 0..4 {
            store.insert(new_reading(&format!("L{i}"), "Garage", 5.0)).await.unwrap();
            store.insert(new_reading(&format!("N{i}"), "Kitchen", 2.0)).await.unwrap();
        }

        let leaks = store.find_recent(&ReadingFilter::leaking(), 3).await.unwrap();
        assert_eq!(leaks.len(), 3);
        assert!(leaks.iter().all(|r| r.is_leaking));

        let kitchen = ReadingFilter {
            location: Some("Kitchen".into()),
            ..ReadingFilter::default()
        };
        let rows = store.find_recent(&kitchen, 100).await.unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.location == "Kitchen"));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn empty_sensor_id_violates_constraint(pool: PgPool) {
        let store = PgReadingStore::new(pool);
        let err = store.insert(new_reading("", "Kitchen", 1.0)).await.unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn ping_succeeds_on_live_pool(pool: PgPool) {
        let store = PgReadingStore::new(pool);
        store.ping().await.unwrap();
    }
}
