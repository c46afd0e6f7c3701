//! Maintenance requests repository for database operations

use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::RequestStage,
        request::{CreateRequest, MaintenanceRequest, RequestQuery, RequestScope},
    },
};

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

/// Append the scope's WHERE fragment, reserving placeholder indexes.
fn push_scope_condition(scope: &RequestScope, conditions: &mut Vec<String>, idx: &mut usize) {
    match scope {
        RequestScope::All => {}
        RequestScope::Team { .. } => {
            conditions.push(format!(
                "(assigned_technician_id = ${} OR maintenance_team_id = ${})",
                *idx,
                *idx + 1
            ));
            *idx += 2;
        }
        RequestScope::CreatedBy(_) => {
            conditions.push(format!("created_by_id = ${}", *idx));
            *idx += 1;
        }
    }
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceRequest> {
        sqlx::query_as::<_, MaintenanceRequest>("SELECT * FROM maintenance_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance request {} not found", id)))
    }

    /// Create a request with the equipment snapshot captured by the service
    pub async fn create(
        &self,
        data: &CreateRequest,
        equipment_category: &str,
        maintenance_team_id: i32,
        assigned_technician_id: Option<i32>,
        created_by_id: i32,
    ) -> AppResult<MaintenanceRequest> {
        let request = sqlx::query_as::<_, MaintenanceRequest>(
            r#"
            INSERT INTO maintenance_requests (
                subject, description, equipment_id, equipment_category,
                maintenance_team_id, request_type, stage, priority,
                scheduled_date, assigned_technician_id, created_by_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'new', $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&data.subject)
        .bind(&data.description)
        .bind(data.equipment_id)
        .bind(equipment_category)
        .bind(maintenance_team_id)
        .bind(data.request_type)
        .bind(data.priority)
        .bind(data.scheduled_date)
        .bind(assigned_technician_id)
        .bind(created_by_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(request)
    }

    /// List requests visible in the given scope, with optional filters
    pub async fn list(
        &self,
        scope: &RequestScope,
        query: &RequestQuery,
    ) -> AppResult<Vec<MaintenanceRequest>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut idx = 1;

        push_scope_condition(scope, &mut conditions, &mut idx);

        macro_rules! add_filter {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    conditions.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_filter!(query.stage, "stage");
        add_filter!(query.priority, "priority");
        add_filter!(query.request_type, "request_type");
        add_filter!(query.equipment_id, "equipment_id");
        add_filter!(query.technician_id, "assigned_technician_id");
        let _ = idx;

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT * FROM maintenance_requests {} ORDER BY created_at DESC",
            where_clause
        );

        let mut builder = sqlx::query_as::<_, MaintenanceRequest>(&sql);
        builder = bind_scope(builder, scope);

        macro_rules! bind_filter {
            ($field:expr) => {
                if let Some(val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_filter!(query.stage);
        bind_filter!(query.priority);
        bind_filter!(query.request_type);
        bind_filter!(query.equipment_id);
        bind_filter!(query.technician_id);

        Ok(builder.fetch_all(&self.pool).await?)
    }

    /// List overdue requests visible in the given scope
    pub async fn list_overdue(&self, scope: &RequestScope) -> AppResult<Vec<MaintenanceRequest>> {
        let mut conditions = vec![
            "scheduled_date < CURRENT_DATE".to_string(),
            "stage NOT IN ('repaired', 'scrap')".to_string(),
        ];
        let mut idx = 1;
        push_scope_condition(scope, &mut conditions, &mut idx);

        let sql = format!(
            "SELECT * FROM maintenance_requests WHERE {} ORDER BY scheduled_date",
            conditions.join(" AND ")
        );

        let builder = bind_scope(sqlx::query_as::<_, MaintenanceRequest>(&sql), scope);
        Ok(builder.fetch_all(&self.pool).await?)
    }

    /// List scheduled requests in a date range, visible in the given scope
    pub async fn list_calendar(
        &self,
        scope: &RequestScope,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<MaintenanceRequest>> {
        let mut idx = 1;
        let mut conditions: Vec<String> = Vec::new();
        push_scope_condition(scope, &mut conditions, &mut idx);
        conditions.push(format!("scheduled_date BETWEEN ${} AND ${}", idx, idx + 1));

        let sql = format!(
            "SELECT * FROM maintenance_requests WHERE {} ORDER BY scheduled_date",
            conditions.join(" AND ")
        );

        let builder = bind_scope(sqlx::query_as::<_, MaintenanceRequest>(&sql), scope)
            .bind(from)
            .bind(to);
        Ok(builder.fetch_all(&self.pool).await?)
    }

    /// Commit a plain (non-cascading) stage change
    pub async fn update_stage(
        &self,
        id: i32,
        stage: RequestStage,
    ) -> AppResult<MaintenanceRequest> {
        sqlx::query_as::<_, MaintenanceRequest>(
            "UPDATE maintenance_requests SET stage = $1, updated_at = $2 WHERE id = $3 RETURNING *",
        )
        .bind(stage)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Maintenance request {} not found", id)))
    }

    /// Scrap cascade: deactivate the equipment and move the request to Scrap
    /// inside one transaction, so the two records cannot diverge.
    ///
    /// Deactivation runs first; if it fails, the stage change never commits.
    pub async fn scrap(&self, id: i32, equipment_id: i32) -> AppResult<MaintenanceRequest> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE equipment SET is_active = FALSE, updated_at = $1 WHERE id = $2 AND is_active = TRUE",
        )
        .bind(now)
        .bind(equipment_id)
        .execute(&mut *tx)
        .await?;

        let request = sqlx::query_as::<_, MaintenanceRequest>(
            "UPDATE maintenance_requests SET stage = 'scrap', updated_at = $1 WHERE id = $2 RETURNING *",
        )
        .bind(now)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Maintenance request {} not found", id)))?;

        tx.commit().await?;
        Ok(request)
    }

    /// Assign a technician
    pub async fn assign_technician(
        &self,
        id: i32,
        technician_id: i32,
    ) -> AppResult<MaintenanceRequest> {
        sqlx::query_as::<_, MaintenanceRequest>(
            "UPDATE maintenance_requests SET assigned_technician_id = $1, updated_at = $2 WHERE id = $3 RETURNING *",
        )
        .bind(technician_id)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Maintenance request {} not found", id)))
    }

    /// Partial resolution update
    pub async fn update_resolution(
        &self,
        id: i32,
        duration_hours: Option<rust_decimal::Decimal>,
        resolution_notes: Option<&str>,
    ) -> AppResult<MaintenanceRequest> {
        sqlx::query_as::<_, MaintenanceRequest>(
            r#"
            UPDATE maintenance_requests
            SET duration_hours = COALESCE($1, duration_hours),
                resolution_notes = COALESCE($2, resolution_notes),
                updated_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(duration_hours)
        .bind(resolution_notes)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Maintenance request {} not found", id)))
    }

    /// Delete a request (hard delete, no cascade)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM maintenance_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Maintenance request {} not found",
                id
            )));
        }
        Ok(())
    }

    /// Per-stage counts within the given scope (for the dashboard)
    pub async fn count_by_stage(
        &self,
        scope: &RequestScope,
    ) -> AppResult<Vec<(RequestStage, i64)>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut idx = 1;
        push_scope_condition(scope, &mut conditions, &mut idx);

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT stage, COUNT(*) FROM maintenance_requests {} GROUP BY stage",
            where_clause
        );

        let builder = bind_scope(sqlx::query_as::<_, (RequestStage, i64)>(&sql), scope);
        Ok(builder.fetch_all(&self.pool).await?)
    }

    /// Overdue count within the given scope (for the dashboard)
    pub async fn count_overdue(&self, scope: &RequestScope) -> AppResult<i64> {
        let mut conditions = vec![
            "scheduled_date < CURRENT_DATE".to_string(),
            "stage NOT IN ('repaired', 'scrap')".to_string(),
        ];
        let mut idx = 1;
        push_scope_condition(scope, &mut conditions, &mut idx);

        let sql = format!(
            "SELECT COUNT(*) FROM maintenance_requests WHERE {}",
            conditions.join(" AND ")
        );

        let mut builder = sqlx::query_scalar::<_, i64>(&sql);
        match scope {
            RequestScope::All => {}
            RequestScope::Team {
                technician_id,
                team_id,
            } => {
                builder = builder.bind(technician_id).bind(team_id);
            }
            RequestScope::CreatedBy(user_id) => {
                builder = builder.bind(user_id);
            }
        }
        Ok(builder.fetch_one(&self.pool).await?)
    }
}

/// Bind the scope's placeholders in the same order the condition reserved them.
fn bind_scope<'q, O>(
    builder: sqlx::query::QueryAs<'q, Postgres, O, sqlx::postgres::PgArguments>,
    scope: &RequestScope,
) -> sqlx::query::QueryAs<'q, Postgres, O, sqlx::postgres::PgArguments> {
    match *scope {
        RequestScope::All => builder,
        RequestScope::Team {
            technician_id,
            team_id,
        } => builder.bind(technician_id).bind(team_id),
        RequestScope::CreatedBy(user_id) => builder.bind(user_id),
    }
}
