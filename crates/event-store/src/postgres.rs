use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::{StreamExt, stream};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    AggregateId, AggregateRecord, EventEnvelope, EventId, EventStoreError, Result, Version,
    store::{EventStore, RecordStream, clamp_timestamps, validate_append},
};

const UNIQUE_VERSION_CONSTRAINT: &str = "unique_aggregate_version";

/// PostgreSQL-backed event log.
///
/// All events live in a single `events` table; the
/// `(category, aggregate_id, version)` unique constraint is the final guard
/// against two writers racing past the version check.
#[derive(Clone)]
pub struct PostgresEventStore {
    pool: PgPool,
}

impl PostgresEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url` and runs pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        let store = Self::new(pool);
        store.run_migrations().await?;
        Ok(store)
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_event(row: PgRow) -> Result<EventEnvelope> {
        Ok(EventEnvelope {
            event_id: EventId::from_uuid(row.try_get::<Uuid, _>("id")?),
            category: row.try_get("category")?,
            event_type: row.try_get("event_type")?,
            aggregate_id: AggregateId::from_uuid(row.try_get::<Uuid, _>("aggregate_id")?),
            version: Version::new(row.try_get("version")?),
            timestamp: row.try_get("timestamp")?,
            payload: row.try_get("payload")?,
        })
    }
}

#[async_trait]
impl EventStore for PostgresEventStore {
    async fn load(&self, category: &str, aggregate_id: AggregateId) -> Result<AggregateRecord> {
        let rows = sqlx::query(
            r#"
            SELECT id, category, event_type, aggregate_id, version, timestamp, payload
            FROM events
            WHERE category = $1 AND aggregate_id = $2
            ORDER BY version ASC
            "#,
        )
        .bind(category)
        .bind(aggregate_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        let events = rows
            .into_iter()
            .map(Self::row_to_event)
            .collect::<Result<Vec<_>>>()?;

        Ok(AggregateRecord::from_events(category, aggregate_id, events))
    }

    async fn append(
        &self,
        category: &str,
        aggregate_id: AggregateId,
        mut events: Vec<EventEnvelope>,
        expected_version: Version,
    ) -> Result<Version> {
        validate_append(category, aggregate_id, &events, expected_version)?;

        let mut tx = self.pool.begin().await?;

        let current = sqlx::query(
            r#"
            SELECT COALESCE(MAX(version), 0) AS version, MAX(timestamp) AS last_timestamp
            FROM events
            WHERE category = $1 AND aggregate_id = $2
            "#,
        )
        .bind(category)
        .bind(aggregate_id.as_uuid())
        .fetch_one(&mut *tx)
        .await?;

        let actual = Version::new(current.try_get("version")?);
        if actual != expected_version {
            return Err(EventStoreError::VersionConflict {
                category: category.to_string(),
                aggregate_id,
                expected: expected_version,
                actual,
            });
        }

        let last_timestamp: Option<DateTime<Utc>> = current.try_get("last_timestamp")?;
        clamp_timestamps(last_timestamp, &mut events);

        for event in &events {
            sqlx::query(
                r#"
                INSERT INTO events (id, category, event_type, aggregate_id, version, timestamp, payload)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(event.event_id.as_uuid())
            .bind(&event.category)
            .bind(&event.event_type)
            .bind(event.aggregate_id.as_uuid())
            .bind(event.version.as_i64())
            .bind(event.timestamp)
            .bind(&event.payload)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.constraint() == Some(UNIQUE_VERSION_CONSTRAINT)
                {
                    return EventStoreError::VersionConflict {
                        category: category.to_string(),
                        aggregate_id,
                        expected: expected_version,
                        actual: event.version,
                    };
                }
                EventStoreError::Database(e)
            })?;
        }

        tx.commit().await?;
        Ok(expected_version.advance(events.len()))
    }

    async fn read_all(&self, category: &str) -> Result<RecordStream> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT aggregate_id
            FROM events
            WHERE category = $1
            GROUP BY aggregate_id
            ORDER BY MIN(timestamp) ASC, aggregate_id ASC
            "#,
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        let store = self.clone();
        let category = category.to_string();
        let records = stream::iter(ids).then(move |id| {
            let store = store.clone();
            let category = category.clone();
            async move { store.load(&category, AggregateId::from_uuid(id)).await }
        });

        Ok(Box::pin(records))
    }
}
