//! Maintenance request model and related types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{Priority, RequestStage, RequestType};

/// Maintenance request from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaintenanceRequest {
    pub id: i32,
    pub subject: String,
    pub description: String,
    pub equipment_id: i32,
    /// Snapshot from the equipment at creation time, never re-synced
    pub equipment_category: String,
    /// Snapshot from the equipment at creation time, never re-synced
    pub maintenance_team_id: i32,
    pub request_type: RequestType,
    pub stage: RequestStage,
    pub priority: Priority,
    pub scheduled_date: Option<NaiveDate>,
    pub assigned_technician_id: Option<i32>,
    pub duration_hours: Option<Decimal>,
    pub resolution_notes: Option<String>,
    pub created_by_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MaintenanceRequest {
    pub fn is_overdue(&self) -> bool {
        is_overdue(self.scheduled_date, self.stage, Utc::now().date_naive())
    }
}

/// Overdue derivation: the scheduled date has passed and the request has not
/// reached a closed stage. Never stored, always computed.
pub fn is_overdue(scheduled_date: Option<NaiveDate>, stage: RequestStage, today: NaiveDate) -> bool {
    match scheduled_date {
        Some(date) => date < today && !stage.is_closed(),
        None => false,
    }
}

/// Maintenance request with derived fields for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestDetails {
    pub id: i32,
    pub subject: String,
    pub description: String,
    pub equipment_id: i32,
    pub equipment_category: String,
    pub maintenance_team_id: i32,
    pub request_type: RequestType,
    pub stage: RequestStage,
    pub priority: Priority,
    pub scheduled_date: Option<NaiveDate>,
    pub assigned_technician_id: Option<i32>,
    pub duration_hours: Option<Decimal>,
    pub resolution_notes: Option<String>,
    pub created_by_id: i32,
    pub is_overdue: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<MaintenanceRequest> for RequestDetails {
    fn from(request: MaintenanceRequest) -> Self {
        let is_overdue = request.is_overdue();
        Self {
            id: request.id,
            subject: request.subject,
            description: request.description,
            equipment_id: request.equipment_id,
            equipment_category: request.equipment_category,
            maintenance_team_id: request.maintenance_team_id,
            request_type: request.request_type,
            stage: request.stage,
            priority: request.priority,
            scheduled_date: request.scheduled_date,
            assigned_technician_id: request.assigned_technician_id,
            duration_hours: request.duration_hours,
            resolution_notes: request.resolution_notes,
            created_by_id: request.created_by_id,
            is_overdue,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

/// Create maintenance request payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRequest {
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub equipment_id: i32,
    pub request_type: RequestType,
    pub priority: Priority,
    pub scheduled_date: Option<NaiveDate>,
    /// Defaults to the equipment's default technician when omitted
    pub assigned_technician_id: Option<i32>,
}

/// Stage change payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStage {
    pub stage: RequestStage,
    /// Required true for a Scrap transition (destructive: deactivates the
    /// equipment)
    pub confirm: Option<bool>,
}

/// Technician assignment payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignTechnician {
    pub technician_id: i32,
}

/// Resolution update payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateResolution {
    pub duration_hours: Option<Decimal>,
    pub resolution_notes: Option<String>,
}

/// Role-based visibility scope applied to every maintenance request read.
///
/// Derived from the actor's claims by the access filter and translated into
/// SQL exactly once in the repository, so list, overdue, calendar and
/// dashboard views cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestScope {
    /// Admins and managers see everything
    All,
    /// Technicians see their assignments and their team's requests
    Team {
        technician_id: i32,
        team_id: Option<i32>,
    },
    /// Basic users see only what they created
    CreatedBy(i32),
}

/// Maintenance request list filters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RequestQuery {
    pub stage: Option<RequestStage>,
    pub priority: Option<Priority>,
    pub request_type: Option<RequestType>,
    pub equipment_id: Option<i32>,
    pub technician_id: Option<i32>,
}

/// Calendar view range
#[derive(Debug, Deserialize, IntoParams)]
pub struct CalendarQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_overdue_requires_past_scheduled_date() {
        let today = date(2024, 6, 15);
        assert!(is_overdue(Some(date(2024, 6, 14)), RequestStage::New, today));
        assert!(!is_overdue(Some(date(2024, 6, 15)), RequestStage::New, today));
        assert!(!is_overdue(Some(date(2024, 6, 16)), RequestStage::New, today));
        assert!(!is_overdue(None, RequestStage::New, today));
    }

    #[test]
    fn test_closed_stages_are_never_overdue() {
        let today = date(2024, 6, 15);
        let past = Some(date(2024, 1, 1));
        assert!(is_overdue(past, RequestStage::InProgress, today));
        assert!(!is_overdue(past, RequestStage::Repaired, today));
        assert!(!is_overdue(past, RequestStage::Scrap, today));
    }
}
