use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::repositories::RepositoryError;
use crate::domain::workflow::{LifecycleEvent, LifecycleEventKind};
use crate::orchestration::EventRecorder;

/// Appends lifecycle events to the `workflow_events` table
pub struct PostgresEventRecorder {
    pool: PgPool,
}

impl PostgresEventRecorder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct EventRow {
    event_type: String,
    workflow_id: Uuid,
    worker_id: Option<String>,
    duration_ms: Option<i64>,
    status: String,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for LifecycleEvent {
    type Error = RepositoryError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let kind: LifecycleEventKind = row
            .event_type
            .parse()
            .map_err(|e| RepositoryError::Database(format!("Invalid event type from database: {}", e)))?;

        Ok(LifecycleEvent {
            kind,
            workflow_id: row.workflow_id,
            worker_id: row.worker_id,
            duration_ms: row.duration_ms.map(|ms| ms.max(0) as u64),
            status: row.status,
            owner_id: row.owner_id,
            timestamp: row.created_at,
        })
    }
}

#[async_trait]
impl EventRecorder for PostgresEventRecorder {
    async fn record(&self, event: &LifecycleEvent) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO workflow_events (
                event_type, workflow_id, worker_id, duration_ms, status, owner_id, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(event.kind.as_str())
        .bind(event.workflow_id)
        .bind(event.worker_id.as_deref())
        .bind(event.duration_ms.map(|ms| ms as i64))
        .bind(&event.status)
        .bind(event.owner_id)
        .bind(event.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn events_for_owner(&self, owner_id: Uuid, limit: usize) -> Result<Vec<LifecycleEvent>, RepositoryError> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT event_type, workflow_id, worker_id, duration_ms, status, owner_id, created_at
            FROM workflow_events
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(owner_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LifecycleEvent::try_from).collect()
    }
}
