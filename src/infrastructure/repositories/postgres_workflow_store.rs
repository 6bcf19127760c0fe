use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::repositories::{RepositoryError, WorkflowStore};
use crate::domain::worker::WorkerResult;
use crate::domain::workflow::{Task, Workflow, WorkflowStatus, WorkflowSummary};

/// PostgreSQL implementation of WorkflowStore
///
/// Tasks and results are stored as JSONB documents so their shape can evolve
/// without schema changes. Status updates are conditional on the stored
/// predecessor status, so a regression can never be written.
pub struct PostgresWorkflowStore {
    pool: PgPool,
}

impl PostgresWorkflowStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct WorkflowRow {
    id: Uuid,
    name: String,
    tasks: Json<Vec<Task>>,
    status: WorkflowStatus,
    results: Json<Vec<WorkerResult>>,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<WorkflowRow> for Workflow {
    fn from(row: WorkflowRow) -> Self {
        Workflow::from_persistence(
            row.id,
            row.name,
            row.tasks.0,
            row.status,
            row.results.0,
            row.owner_id,
            row.created_at,
            row.updated_at,
        )
    }
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    id: Uuid,
    name: String,
    status: WorkflowStatus,
}

#[async_trait]
impl WorkflowStore for PostgresWorkflowStore {
    async fn insert(&self, workflow: &Workflow) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO workflows (
                id, name, tasks, status, results, owner_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(workflow.id())
        .bind(workflow.name())
        .bind(Json(workflow.tasks()))
        .bind(workflow.status())
        .bind(Json(workflow.results()))
        .bind(workflow.owner_id())
        .bind(workflow.created_at())
        .bind(workflow.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid, owner_id: Option<Uuid>) -> Result<Workflow, RepositoryError> {
        let row = sqlx::query_as::<_, WorkflowRow>(
            r#"
            SELECT id, name, tasks, status, results, owner_id, created_at, updated_at
            FROM workflows
            WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2)
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Workflow::from)
            .ok_or_else(|| RepositoryError::NotFound(format!("workflow {}", id)))
    }

    async fn update_status(&self, id: Uuid, next: WorkflowStatus) -> Result<(), RepositoryError> {
        let invalid = |from: WorkflowStatus| RepositoryError::InvalidTransition {
            from: from.to_string(),
            to: next.to_string(),
        };

        let Some(predecessor) = next.predecessor() else {
            let current = self.current_status(id).await?;
            return Err(invalid(current));
        };

        let updated = sqlx::query(
            r#"
            UPDATE workflows
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = $3
            "#,
        )
        .bind(id)
        .bind(next)
        .bind(predecessor)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            let current = self.current_status(id).await?;
            return Err(invalid(current));
        }

        Ok(())
    }

    async fn update_results(&self, id: Uuid, results: &[WorkerResult]) -> Result<(), RepositoryError> {
        let updated = sqlx::query(
            r#"
            UPDATE workflows
            SET results = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Json(results))
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("workflow {}", id)));
        }

        Ok(())
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<WorkflowSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            r#"
            SELECT id, name, status
            FROM workflows
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| WorkflowSummary {
                id: r.id,
                name: r.name,
                status: r.status,
            })
            .collect())
    }
}

impl PostgresWorkflowStore {
    async fn current_status(&self, id: Uuid) -> Result<WorkflowStatus, RepositoryError> {
        sqlx::query_scalar::<_, WorkflowStatus>("SELECT status FROM workflows WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("workflow {}", id)))
    }
}
