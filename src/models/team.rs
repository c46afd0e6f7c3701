//! Maintenance team model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::user::UserShort;

/// Maintenance team record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaintenanceTeam {
    pub id: i32,
    pub name: String,
    pub specialization: Option<String>,
    pub team_lead_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Team with resolved member list (users whose team_id points here)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamDetails {
    pub id: i32,
    pub name: String,
    pub specialization: Option<String>,
    pub team_lead_id: Option<i32>,
    pub members: Vec<UserShort>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TeamDetails {
    pub fn from_team(team: MaintenanceTeam, members: Vec<UserShort>) -> Self {
        Self {
            id: team.id,
            name: team.name,
            specialization: team.specialization,
            team_lead_id: team.team_lead_id,
            members,
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

/// Create team request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTeam {
    #[validate(length(min = 1, message = "Team name is required"))]
    pub name: String,
    pub specialization: Option<String>,
    pub team_lead_id: Option<i32>,
}

/// Update team request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTeam {
    #[validate(length(min = 1, message = "Team name must not be empty"))]
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub team_lead_id: Option<i32>,
}
