//! Maintenance teams repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::team::{CreateTeam, MaintenanceTeam, UpdateTeam},
};

#[derive(Clone)]
pub struct TeamsRepository {
    pool: Pool<Postgres>,
}

impl TeamsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all teams
    pub async fn list(&self) -> AppResult<Vec<MaintenanceTeam>> {
        let teams = sqlx::query_as::<_, MaintenanceTeam>(
            "SELECT * FROM maintenance_teams ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(teams)
    }

    /// Get team by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceTeam> {
        sqlx::query_as::<_, MaintenanceTeam>("SELECT * FROM maintenance_teams WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance team {} not found", id)))
    }

    /// Create a team
    pub async fn create(&self, data: &CreateTeam) -> AppResult<MaintenanceTeam> {
        sqlx::query_as::<_, MaintenanceTeam>(
            r#"
            INSERT INTO maintenance_teams (name, specialization, team_lead_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.specialization)
        .bind(data.team_lead_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("Team '{}' already exists", data.name))
            }
            _ => AppError::from(e),
        })
    }

    /// Update a team
    pub async fn update(&self, id: i32, data: &UpdateTeam) -> AppResult<MaintenanceTeam> {
        let now = Utc::now();
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.specialization, "specialization");
        add_field!(data.team_lead_id, "team_lead_id");
        let _ = idx;

        let query = format!(
            "UPDATE maintenance_teams SET {} WHERE id = {} RETURNING *",
            sets.join(", "),
            id
        );

        let mut builder = sqlx::query_as::<_, MaintenanceTeam>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.specialization);
        bind_field!(data.team_lead_id);

        builder
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    AppError::Conflict("A team with that name already exists".to_string())
                }
                _ => AppError::from(e),
            })?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance team {} not found", id)))
    }

    /// Delete a team
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM maintenance_teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => AppError::Conflict(
                    format!("Maintenance team {} is referenced by equipment or requests", id),
                ),
                _ => AppError::from(e),
            })?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Maintenance team {} not found", id)));
        }
        Ok(())
    }
}
