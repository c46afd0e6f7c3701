//! Equipment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::OwnershipType;

/// Equipment record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    pub serial_number: String,
    pub category: String,
    pub location: Option<String>,
    pub ownership_type: OwnershipType,
    /// Owning department (ownership_type = department)
    pub department: Option<String>,
    /// Assigned employee (ownership_type = employee)
    pub assigned_employee_id: Option<i32>,
    pub maintenance_team_id: i32,
    pub default_technician_id: i32,
    /// Cleared by the workflow when a linked request reaches Scrap
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Auto-fill bundle for new maintenance requests, sourced from the equipment
/// at creation time
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EquipmentAutoFill {
    pub equipment_id: i32,
    pub category: String,
    pub maintenance_team_id: i32,
    pub default_technician_id: i32,
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Serial number is required"))]
    pub serial_number: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    pub location: Option<String>,
    pub ownership_type: OwnershipType,
    pub department: Option<String>,
    pub assigned_employee_id: Option<i32>,
    pub maintenance_team_id: i32,
    pub default_technician_id: i32,
    pub notes: Option<String>,
}

/// Update equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEquipment {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Category must not be empty"))]
    pub category: Option<String>,
    pub location: Option<String>,
    pub ownership_type: Option<OwnershipType>,
    pub department: Option<String>,
    pub assigned_employee_id: Option<i32>,
    pub maintenance_team_id: Option<i32>,
    pub default_technician_id: Option<i32>,
    pub is_active: Option<bool>,
    pub notes: Option<String>,
}

/// Equipment query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct EquipmentQuery {
    pub category: Option<String>,
    pub maintenance_team_id: Option<i32>,
    pub is_active: Option<bool>,
}
