//! Equipment repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::OwnershipType,
        equipment::{CreateEquipment, Equipment, EquipmentQuery, UpdateEquipment},
    },
};

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List equipment with optional filters
    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut idx = 1;

        if query.category.is_some() {
            conditions.push(format!("category = ${}", idx));
            idx += 1;
        }
        if query.maintenance_team_id.is_some() {
            conditions.push(format!("maintenance_team_id = ${}", idx));
            idx += 1;
        }
        if query.is_active.is_some() {
            conditions.push(format!("is_active = ${}", idx));
            idx += 1;
        }
        let _ = idx;

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!("SELECT * FROM equipment {} ORDER BY name", where_clause);

        let mut builder = sqlx::query_as::<_, Equipment>(&sql);
        if let Some(ref category) = query.category {
            builder = builder.bind(category);
        }
        if let Some(team_id) = query.maintenance_team_id {
            builder = builder.bind(team_id);
        }
        if let Some(is_active) = query.is_active {
            builder = builder.bind(is_active);
        }

        Ok(builder.fetch_all(&self.pool).await?)
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Create equipment
    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (
                name, serial_number, category, location, ownership_type,
                department, assigned_employee_id, maintenance_team_id,
                default_technician_id, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.serial_number)
        .bind(&data.category)
        .bind(&data.location)
        .bind(data.ownership_type)
        .bind(&data.department)
        .bind(data.assigned_employee_id)
        .bind(data.maintenance_team_id)
        .bind(data.default_technician_id)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(format!(
                "Equipment with serial number '{}' already exists",
                data.serial_number
            )),
            _ => AppError::from(e),
        })
    }

    /// Update equipment
    ///
    /// The ownership triple is always written as a unit (the service resolves
    /// it against the current record) so the exactly-one-of invariant cannot
    /// be broken by a partial update.
    pub async fn update(
        &self,
        id: i32,
        data: &UpdateEquipment,
        ownership_type: OwnershipType,
        department: Option<String>,
        assigned_employee_id: Option<i32>,
    ) -> AppResult<Equipment> {
        let now = Utc::now();
        let mut sets = vec![
            "updated_at = $1".to_string(),
            "ownership_type = $2".to_string(),
            "department = $3".to_string(),
            "assigned_employee_id = $4".to_string(),
        ];
        let mut idx = 5;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.category, "category");
        add_field!(data.location, "location");
        add_field!(data.maintenance_team_id, "maintenance_team_id");
        add_field!(data.default_technician_id, "default_technician_id");
        add_field!(data.is_active, "is_active");
        add_field!(data.notes, "notes");
        let _ = idx;

        let query = format!(
            "UPDATE equipment SET {} WHERE id = {} RETURNING *",
            sets.join(", "),
            id
        );

        let mut builder = sqlx::query_as::<_, Equipment>(&query)
            .bind(now)
            .bind(ownership_type)
            .bind(department)
            .bind(assigned_employee_id);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.category);
        bind_field!(data.location);
        bind_field!(data.maintenance_team_id);
        bind_field!(data.default_technician_id);
        bind_field!(data.is_active);
        bind_field!(data.notes);

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Deactivate equipment, idempotently
    ///
    /// The guard on is_active leaves an already-inactive row untouched.
    pub async fn deactivate(&self, id: i32) -> AppResult<()> {
        sqlx::query("UPDATE equipment SET is_active = FALSE, updated_at = $1 WHERE id = $2 AND is_active = TRUE")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete equipment
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => AppError::Conflict(
                    format!("Equipment {} has linked maintenance requests", id),
                ),
                _ => AppError::from(e),
            })?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Equipment {} not found", id)));
        }
        Ok(())
    }

    /// Count equipment by active flag (for the dashboard)
    pub async fn count_by_active(&self, is_active: bool) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM equipment WHERE is_active = $1")
            .bind(is_active)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
