//! Role-based access filter for maintenance requests
//!
//! One place decides who sees which requests and who may move them through
//! the workflow; list endpoints, calendar/overdue views, single-record reads
//! and the stage role gate all go through these functions.

use crate::models::{
    enums::Role,
    request::{MaintenanceRequest, RequestScope},
    user::UserClaims,
};

/// Visibility scope for the actor's role.
pub fn scope_for(claims: &UserClaims) -> RequestScope {
    match claims.role {
        Role::Admin | Role::Manager => RequestScope::All,
        Role::Technician => RequestScope::Team {
            technician_id: claims.user_id,
            team_id: claims.team_id,
        },
        Role::User => RequestScope::CreatedBy(claims.user_id),
    }
}

/// Whether the actor may read this request (the single-record counterpart of
/// [`scope_for`]).
pub fn can_view(claims: &UserClaims, request: &MaintenanceRequest) -> bool {
    match scope_for(claims) {
        RequestScope::All => true,
        RequestScope::Team {
            technician_id,
            team_id,
        } => {
            request.assigned_technician_id == Some(technician_id)
                || team_id == Some(request.maintenance_team_id)
        }
        RequestScope::CreatedBy(user_id) => request.created_by_id == user_id,
    }
}

/// Stage transition / resolution role gate: admin, manager, or the request's
/// assigned technician. A basic user never passes, even if they were somehow
/// assigned to the request.
pub fn can_transition(claims: &UserClaims, request: &MaintenanceRequest) -> bool {
    match claims.role {
        Role::Admin | Role::Manager => true,
        Role::Technician => request.assigned_technician_id == Some(claims.user_id),
        Role::User => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{Priority, RequestStage, RequestType};
    use chrono::Utc;

    fn claims(user_id: i32, role: Role, team_id: Option<i32>) -> UserClaims {
        UserClaims {
            sub: format!("user-{}", user_id),
            user_id,
            role,
            team_id,
            exp: 0,
            iat: 0,
        }
    }

    fn request(created_by: i32, technician: Option<i32>, team: i32) -> MaintenanceRequest {
        MaintenanceRequest {
            id: 1,
            subject: "Broken spindle".to_string(),
            description: "Spindle seized under load".to_string(),
            equipment_id: 7,
            equipment_category: "CNC".to_string(),
            maintenance_team_id: team,
            request_type: RequestType::Corrective,
            stage: RequestStage::New,
            priority: Priority::High,
            scheduled_date: None,
            assigned_technician_id: technician,
            duration_hours: None,
            resolution_notes: None,
            created_by_id: created_by,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_supervisors_see_everything() {
        assert_eq!(scope_for(&claims(1, Role::Admin, None)), RequestScope::All);
        assert_eq!(scope_for(&claims(2, Role::Manager, None)), RequestScope::All);
    }

    #[test]
    fn test_technician_sees_assignment_or_team() {
        let tech = claims(10, Role::Technician, Some(3));
        assert!(can_view(&tech, &request(99, Some(10), 5)));
        assert!(can_view(&tech, &request(99, None, 3)));
        assert!(!can_view(&tech, &request(99, Some(11), 5)));
    }

    #[test]
    fn test_technician_without_team_sees_only_assignments() {
        let tech = claims(10, Role::Technician, None);
        assert!(can_view(&tech, &request(99, Some(10), 5)));
        assert!(!can_view(&tech, &request(99, None, 5)));
    }

    #[test]
    fn test_basic_user_sees_only_own_requests() {
        let user = claims(20, Role::User, None);
        assert!(can_view(&user, &request(20, None, 1)));
        assert!(!can_view(&user, &request(21, None, 1)));
        // Even being the assigned technician does not widen a basic user's scope
        assert!(!can_view(&user, &request(21, Some(20), 1)));
    }

    #[test]
    fn test_transition_gate() {
        let r = request(99, Some(10), 3);
        assert!(can_transition(&claims(1, Role::Admin, None), &r));
        assert!(can_transition(&claims(2, Role::Manager, None), &r));
        assert!(can_transition(&claims(10, Role::Technician, Some(3)), &r));
        // Team membership alone is not enough to move a request
        assert!(!can_transition(&claims(11, Role::Technician, Some(3)), &r));
        assert!(!can_transition(&claims(99, Role::User, None), &r));
        // A basic user fails the gate even when listed as the technician
        assert!(!can_transition(&claims(10, Role::User, None), &r));
    }
}
