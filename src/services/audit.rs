//! Audit log service
//!
//! Injected collaborator recording every mutating operation. Appending is
//! best-effort: a failed write is logged and never fails the operation that
//! triggered it.

use crate::{models::user::UserClaims, repository::Repository};

#[derive(Clone)]
pub struct AuditService {
    repository: Repository,
}

impl AuditService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Record an action against an entity
    pub async fn record(
        &self,
        actor: &UserClaims,
        action: &str,
        entity_type: &str,
        entity_id: i32,
        details: serde_json::Value,
    ) {
        if let Err(e) = self
            .repository
            .audit
            .insert(Some(actor.user_id), action, entity_type, entity_id, &details)
            .await
        {
            tracing::warn!(
                action,
                entity_type,
                entity_id,
                "Failed to record audit entry: {}",
                e
            );
        }
    }
}
