//! Users repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::Role,
        user::{CreateUser, UpdateUser, User, UserQuery, UserShort},
    },
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Get user by login (for authentication)
    pub async fn get_by_login(&self, login: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE login = $1")
            .bind(login)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// List users with optional filters
    pub async fn list(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut idx = 1;

        if query.name.is_some() {
            conditions.push(format!(
                "(login ILIKE ${0} OR firstname ILIKE ${0} OR lastname ILIKE ${0})",
                idx
            ));
            idx += 1;
        }
        if query.role.is_some() {
            conditions.push(format!("role = ${}", idx));
            idx += 1;
        }
        if query.team_id.is_some() {
            conditions.push(format!("team_id = ${}", idx));
            idx += 1;
        }
        let _ = idx;

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!("SELECT * FROM users {} ORDER BY login", where_clause);

        let mut builder = sqlx::query_as::<_, User>(&sql);
        if let Some(ref name) = query.name {
            builder = builder.bind(format!("%{}%", name));
        }
        if let Some(role) = query.role {
            builder = builder.bind(role);
        }
        if let Some(team_id) = query.team_id {
            builder = builder.bind(team_id);
        }

        Ok(builder.fetch_all(&self.pool).await?)
    }

    /// List team members as short records
    pub async fn list_by_team(&self, team_id: i32) -> AppResult<Vec<UserShort>> {
        let members = sqlx::query_as::<_, UserShort>(
            "SELECT id, login, firstname, lastname, role FROM users WHERE team_id = $1 ORDER BY login",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    /// Create a user; the password must already be hashed
    pub async fn create(&self, data: &CreateUser, password_hash: &str) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (login, password, firstname, lastname, email, role, team_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&data.login)
        .bind(password_hash)
        .bind(&data.firstname)
        .bind(&data.lastname)
        .bind(&data.email)
        .bind(data.role.unwrap_or(Role::User))
        .bind(data.team_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("Login '{}' already exists", data.login))
            }
            _ => AppError::from(e),
        })
    }

    /// Update a user; `password_hash` replaces the stored hash when present
    pub async fn update(
        &self,
        id: i32,
        data: &UpdateUser,
        password_hash: Option<&str>,
    ) -> AppResult<User> {
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

        add_field!(password_hash, "password");
        add_field!(data.firstname, "firstname");
        add_field!(data.lastname, "lastname");
        add_field!(data.email, "email");
        add_field!(data.role, "role");
        add_field!(data.team_id, "team_id");
        let _ = idx;

        let query = format!(
            "UPDATE users SET {} WHERE id = {} RETURNING *",
            sets.join(", "),
            id
        );

        let mut builder = sqlx::query_as::<_, User>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(password_hash);
        bind_field!(data.firstname);
        bind_field!(data.lastname);
        bind_field!(data.email);
        if let Some(role) = data.role {
            builder = builder.bind(role);
        }
        if let Some(team_id) = data.team_id {
            builder = builder.bind(team_id);
        }

        builder
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Delete a user
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => AppError::Conflict(
                    format!("User {} is referenced by equipment or maintenance requests", id),
                ),
                _ => AppError::from(e),
            })?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }

    /// Count all users (used by the default-admin bootstrap)
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
