//! Maintenance request service (request lifecycle engine)
//!
//! Creation snapshots the equipment auto-fill bundle, stage changes run
//! through the shared workflow graph behind the role gate, and a Scrap
//! transition cascades into equipment deactivation inside one transaction.

use serde_json::json;
use validator::{Validate, ValidationErrors};

use crate::{
    error::{validation_message, AppError, AppResult},
    models::{
        enums::{RequestStage, RequestType},
        request::{
            CalendarQuery, CreateRequest, MaintenanceRequest, RequestDetails, RequestQuery,
            UpdateResolution,
        },
        user::UserClaims,
    },
    repository::Repository,
    workflow,
};

use super::{access, audit::AuditService, equipment::EquipmentService};

/// Attempts for the scrap cascade transaction before surfacing CascadeFailure
const SCRAP_CASCADE_ATTEMPTS: u32 = 3;

/// Collect every violation in the create payload into one error.
fn create_violations(data: &CreateRequest) -> ValidationErrors {
    let mut errors = match data.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(e) => e,
    };
    if data.request_type == RequestType::Preventive && data.scheduled_date.is_none() {
        errors.add(
            "scheduled_date",
            validation_message("required", "Scheduled date is required for preventive requests"),
        );
    }
    errors
}

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
    equipment: EquipmentService,
    audit: AuditService,
}

impl RequestsService {
    pub fn new(repository: Repository, equipment: EquipmentService, audit: AuditService) -> Self {
        Self {
            repository,
            equipment,
            audit,
        }
    }

    /// Create a request against active equipment.
    ///
    /// Category and team are snapshotted from the equipment at this instant;
    /// the technician defaults to the equipment's default technician.
    pub async fn create(&self, data: &CreateRequest, actor: &UserClaims) -> AppResult<RequestDetails> {
        let violations = create_violations(data);
        if !violations.is_empty() {
            return Err(violations.into());
        }

        // Propagates NotFound / InactiveEquipment from the registry
        let auto_fill = self.equipment.auto_fill(data.equipment_id).await?;

        if let Some(technician_id) = data.assigned_technician_id {
            self.repository.users.get_by_id(technician_id).await?;
        }
        let technician_id = data
            .assigned_technician_id
            .unwrap_or(auto_fill.default_technician_id);

        let request = self
            .repository
            .requests
            .create(
                data,
                &auto_fill.category,
                auto_fill.maintenance_team_id,
                Some(technician_id),
                actor.user_id,
            )
            .await?;

        self.audit
            .record(
                actor,
                "request.created",
                "maintenance_request",
                request.id,
                json!({
                    "equipment_id": request.equipment_id,
                    "request_type": request.request_type,
                    "priority": request.priority,
                }),
            )
            .await;

        Ok(request.into())
    }

    /// List requests visible to the actor, with optional filters
    pub async fn list(&self, actor: &UserClaims, query: &RequestQuery) -> AppResult<Vec<RequestDetails>> {
        let scope = access::scope_for(actor);
        let requests = self.repository.requests.list(&scope, query).await?;
        Ok(requests.into_iter().map(RequestDetails::from).collect())
    }

    /// List overdue requests visible to the actor
    pub async fn list_overdue(&self, actor: &UserClaims) -> AppResult<Vec<RequestDetails>> {
        let scope = access::scope_for(actor);
        let requests = self.repository.requests.list_overdue(&scope).await?;
        Ok(requests.into_iter().map(RequestDetails::from).collect())
    }

    /// Calendar view: scheduled requests in a date range, visible to the actor
    pub async fn list_calendar(
        &self,
        actor: &UserClaims,
        range: &CalendarQuery,
    ) -> AppResult<Vec<RequestDetails>> {
        if range.from > range.to {
            return Err(AppError::Validation(
                "from: must not be after the 'to' date".to_string(),
            ));
        }
        let scope = access::scope_for(actor);
        let requests = self
            .repository
            .requests
            .list_calendar(&scope, range.from, range.to)
            .await?;
        Ok(requests.into_iter().map(RequestDetails::from).collect())
    }

    /// Fetch one request, enforcing the same visibility rules as the lists
    pub async fn get(&self, id: i32, actor: &UserClaims) -> AppResult<RequestDetails> {
        let request = self.repository.requests.get_by_id(id).await?;
        if !access::can_view(actor, &request) {
            return Err(AppError::Authorization(
                "You do not have access to this maintenance request".to_string(),
            ));
        }
        Ok(request.into())
    }

    /// Move a request to a new stage.
    ///
    /// Same-stage writes are a no-op. A Scrap transition deactivates the
    /// equipment and commits the stage in one transaction; if the transaction
    /// cannot commit after bounded retries the failure surfaces as Cascade so
    /// callers can reconcile.
    pub async fn update_stage(
        &self,
        id: i32,
        new_stage: RequestStage,
        actor: &UserClaims,
    ) -> AppResult<RequestDetails> {
        let request = self.repository.requests.get_by_id(id).await?;

        if !access::can_transition(actor, &request) {
            return Err(AppError::Authorization(
                "Administrator, manager or assigned technician role required".to_string(),
            ));
        }

        // No-op: no write, no cascade, no audit entry
        if request.stage == new_stage {
            return Ok(request.into());
        }

        if !workflow::is_valid_transition(request.stage, new_stage) {
            return Err(AppError::InvalidTransition {
                from: request.stage,
                to: new_stage,
            });
        }

        let from = request.stage;
        let updated = if new_stage == RequestStage::Scrap {
            self.scrap_with_retry(&request).await?
        } else {
            self.repository.requests.update_stage(request.id, new_stage).await?
        };

        self.audit
            .record(
                actor,
                "request.stage_changed",
                "maintenance_request",
                updated.id,
                json!({ "from": from, "to": new_stage }),
            )
            .await;

        Ok(updated.into())
    }

    async fn scrap_with_retry(&self, request: &MaintenanceRequest) -> AppResult<MaintenanceRequest> {
        let mut attempt = 1;
        loop {
            match self
                .repository
                .requests
                .scrap(request.id, request.equipment_id)
                .await
            {
                Ok(updated) => return Ok(updated),
                Err(AppError::Database(e)) if attempt < SCRAP_CASCADE_ATTEMPTS => {
                    tracing::warn!(
                        request_id = request.id,
                        attempt,
                        "Scrap cascade attempt failed, retrying: {}",
                        e
                    );
                    attempt += 1;
                }
                Err(AppError::Database(e)) => {
                    return Err(AppError::Cascade(format!(
                        "Could not atomically deactivate equipment {} and scrap request {} after {} attempts: {}",
                        request.equipment_id, request.id, SCRAP_CASCADE_ATTEMPTS, e
                    )));
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Assign a technician (admin/manager only).
    ///
    /// The technician is not required to belong to the request's maintenance
    /// team; dispatchers may pull in help from other teams.
    pub async fn assign_technician(
        &self,
        id: i32,
        technician_id: i32,
        actor: &UserClaims,
    ) -> AppResult<RequestDetails> {
        actor.require_supervisor()?;
        self.repository.requests.get_by_id(id).await?;
        self.repository.users.get_by_id(technician_id).await?;

        let updated = self
            .repository
            .requests
            .assign_technician(id, technician_id)
            .await?;

        self.audit
            .record(
                actor,
                "request.technician_assigned",
                "maintenance_request",
                updated.id,
                json!({ "technician_id": technician_id }),
            )
            .await;

        Ok(updated.into())
    }

    /// Record resolution details (admin/manager or assigned technician)
    pub async fn update_resolution(
        &self,
        id: i32,
        data: &UpdateResolution,
        actor: &UserClaims,
    ) -> AppResult<RequestDetails> {
        let request = self.repository.requests.get_by_id(id).await?;
        if !access::can_transition(actor, &request) {
            return Err(AppError::Authorization(
                "Administrator, manager or assigned technician role required".to_string(),
            ));
        }

        if let Some(hours) = data.duration_hours {
            if hours < rust_decimal::Decimal::ZERO {
                return Err(AppError::Validation(
                    "duration_hours: must not be negative".to_string(),
                ));
            }
        }

        let updated = self
            .repository
            .requests
            .update_resolution(id, data.duration_hours, data.resolution_notes.as_deref())
            .await?;
        Ok(updated.into())
    }

    /// Delete a request (admin/manager only; hard delete, no cascade)
    pub async fn delete(&self, id: i32, actor: &UserClaims) -> AppResult<()> {
        actor.require_supervisor()?;
        self.repository.requests.get_by_id(id).await?;
        self.repository.requests.delete(id).await?;

        self.audit
            .record(actor, "request.deleted", "maintenance_request", id, json!({}))
            .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::Priority;
    use chrono::NaiveDate;

    fn payload() -> CreateRequest {
        CreateRequest {
            subject: "Conveyor belt slipping".to_string(),
            description: "Belt loses grip under full load".to_string(),
            equipment_id: 1,
            request_type: RequestType::Corrective,
            priority: Priority::Medium,
            scheduled_date: None,
            assigned_technician_id: None,
        }
    }

    #[test]
    fn test_valid_payload_has_no_violations() {
        assert!(create_violations(&payload()).is_empty());
    }

    #[test]
    fn test_preventive_requires_scheduled_date() {
        let mut data = payload();
        data.request_type = RequestType::Preventive;
        let errors = create_violations(&data);
        assert!(errors.field_errors().contains_key("scheduled_date"));

        data.scheduled_date = NaiveDate::from_ymd_opt(2024, 7, 1);
        assert!(create_violations(&data).is_empty());
    }

    #[test]
    fn test_all_violations_reported_together() {
        let mut data = payload();
        data.subject = String::new();
        data.description = String::new();
        data.request_type = RequestType::Preventive;

        let errors = create_violations(&data);
        let fields = errors.field_errors();
        assert!(fields.contains_key("subject"));
        assert!(fields.contains_key("description"));
        assert!(fields.contains_key("scheduled_date"));

        // And the rendered message names every field, not just the first
        let message = match AppError::from(errors) {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {:?}", other),
        };
        assert!(message.contains("subject"));
        assert!(message.contains("description"));
        assert!(message.contains("scheduled_date"));
    }
}
