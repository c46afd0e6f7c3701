//! Equipment registry service
//!
//! Owns the auto-fill bundle for new maintenance requests, the idempotent
//! deactivation used by the scrap cascade, and the ownership invariant on
//! every write.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::{Validate, ValidationErrors};

use crate::{
    error::{validation_message, AppError, AppResult},
    models::{
        enums::OwnershipType,
        equipment::{
            CreateEquipment, Equipment, EquipmentAutoFill, EquipmentQuery, UpdateEquipment,
        },
    },
    repository::Repository,
};

static SERIAL_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{2,63}$").unwrap());

/// Ownership invariant: exactly one of {department, assigned employee} is
/// set, matching the ownership type.
fn ownership_violations(
    ownership_type: OwnershipType,
    department: Option<&str>,
    assigned_employee_id: Option<i32>,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    let has_department = department.map_or(false, |d| !d.trim().is_empty());
    match ownership_type {
        OwnershipType::Department => {
            if !has_department {
                errors.add(
                    "department",
                    validation_message("required", "Department is required for department-owned equipment"),
                );
            }
            if assigned_employee_id.is_some() {
                errors.add(
                    "assigned_employee_id",
                    validation_message("forbidden", "Department-owned equipment cannot have an assigned employee"),
                );
            }
        }
        OwnershipType::Employee => {
            if assigned_employee_id.is_none() {
                errors.add(
                    "assigned_employee_id",
                    validation_message("required", "An assigned employee is required for employee-owned equipment"),
                );
            }
            if has_department {
                errors.add(
                    "department",
                    validation_message("forbidden", "Employee-owned equipment cannot have a department"),
                );
            }
        }
    }
    errors
}

fn merge(mut base: ValidationErrors, extra: ValidationErrors) -> ValidationErrors {
    for (field, errs) in extra.field_errors() {
        for err in errs {
            base.add(field, err.clone());
        }
    }
    base
}

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &EquipmentQuery) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list(query).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        self.repository.equipment.get_by_id(id).await
    }

    /// Auto-fill bundle for a new maintenance request.
    ///
    /// Inactive (scrapped) equipment cannot accept new requests.
    pub async fn auto_fill(&self, equipment_id: i32) -> AppResult<EquipmentAutoFill> {
        let equipment = self.repository.equipment.get_by_id(equipment_id).await?;
        if !equipment.is_active {
            return Err(AppError::InactiveEquipment(equipment.id));
        }
        Ok(EquipmentAutoFill {
            equipment_id: equipment.id,
            category: equipment.category,
            maintenance_team_id: equipment.maintenance_team_id,
            default_technician_id: equipment.default_technician_id,
        })
    }

    /// Idempotent deactivation; already-inactive equipment is left untouched.
    pub async fn deactivate(&self, equipment_id: i32) -> AppResult<Equipment> {
        // Existence check first so an unknown id is NotFound, not a silent no-op
        self.repository.equipment.get_by_id(equipment_id).await?;
        self.repository.equipment.deactivate(equipment_id).await?;
        self.repository.equipment.get_by_id(equipment_id).await
    }

    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        let mut errors = match data.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };
        if !data.serial_number.is_empty() && !SERIAL_NUMBER_RE.is_match(&data.serial_number) {
            errors.add(
                "serial_number",
                validation_message(
                    "format",
                    "Serial number must be 3-64 characters of letters, digits, '.', '_' or '-'",
                ),
            );
        }
        errors = merge(
            errors,
            ownership_violations(
                data.ownership_type,
                data.department.as_deref(),
                data.assigned_employee_id,
            ),
        );
        if !errors.is_empty() {
            return Err(errors.into());
        }

        self.repository.teams.get_by_id(data.maintenance_team_id).await?;
        self.repository.users.get_by_id(data.default_technician_id).await?;
        if let Some(employee_id) = data.assigned_employee_id {
            self.repository.users.get_by_id(employee_id).await?;
        }

        self.repository.equipment.create(data).await
    }

    pub async fn update(&self, id: i32, data: &UpdateEquipment) -> AppResult<Equipment> {
        data.validate()?;

        let current = self.repository.equipment.get_by_id(id).await?;

        // Resolve the ownership triple against the current record. The owning
        // side falls back to the stored value when omitted; the opposite side
        // never does, so switching ownership type clears it, while explicitly
        // sending a contradictory field is rejected below.
        let ownership_type = data.ownership_type.unwrap_or(current.ownership_type);
        let (department, assigned_employee_id) = match ownership_type {
            OwnershipType::Department => (
                data.department.clone().or(current.department),
                data.assigned_employee_id,
            ),
            OwnershipType::Employee => (
                data.department.clone(),
                data.assigned_employee_id.or(current.assigned_employee_id),
            ),
        };

        let errors = ownership_violations(
            ownership_type,
            department.as_deref(),
            assigned_employee_id,
        );
        if !errors.is_empty() {
            return Err(errors.into());
        }

        if let Some(team_id) = data.maintenance_team_id {
            self.repository.teams.get_by_id(team_id).await?;
        }
        if let Some(technician_id) = data.default_technician_id {
            self.repository.users.get_by_id(technician_id).await?;
        }
        if let Some(employee_id) = assigned_employee_id {
            self.repository.users.get_by_id(employee_id).await?;
        }

        self.repository
            .equipment
            .update(id, data, ownership_type, department, assigned_employee_id)
            .await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.equipment.delete(id).await
    }

    pub async fn count_by_active(&self, is_active: bool) -> AppResult<i64> {
        self.repository.equipment.count_by_active(is_active).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_ownership_requires_department() {
        let errors = ownership_violations(OwnershipType::Department, None, None);
        assert!(errors.field_errors().contains_key("department"));

        let errors = ownership_violations(OwnershipType::Department, Some("  "), None);
        assert!(errors.field_errors().contains_key("department"));

        let errors = ownership_violations(OwnershipType::Department, Some("Milling"), None);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_department_ownership_excludes_employee() {
        let errors = ownership_violations(OwnershipType::Department, Some("Milling"), Some(4));
        assert!(errors.field_errors().contains_key("assigned_employee_id"));
    }

    #[test]
    fn test_employee_ownership_requires_employee() {
        let errors = ownership_violations(OwnershipType::Employee, None, None);
        assert!(errors.field_errors().contains_key("assigned_employee_id"));

        let errors = ownership_violations(OwnershipType::Employee, None, Some(4));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_employee_ownership_excludes_department() {
        let errors = ownership_violations(OwnershipType::Employee, Some("Milling"), Some(4));
        assert!(errors.field_errors().contains_key("department"));
    }

    #[test]
    fn test_serial_number_format() {
        assert!(SERIAL_NUMBER_RE.is_match("CNC-042"));
        assert!(SERIAL_NUMBER_RE.is_match("a1.b2_c3"));
        assert!(!SERIAL_NUMBER_RE.is_match("ab"));
        assert!(!SERIAL_NUMBER_RE.is_match("-leading-dash"));
        assert!(!SERIAL_NUMBER_RE.is_match("has space"));
    }
}
