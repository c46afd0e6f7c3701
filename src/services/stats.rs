//! Dashboard statistics service

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{enums::RequestStage, user::UserClaims},
    repository::Repository,
};

use super::access;

/// Request counts per workflow stage
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct StageCounts {
    pub new: i64,
    pub in_progress: i64,
    pub repaired: i64,
    pub scrap: i64,
}

/// Role-scoped dashboard counters
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub requests: StageCounts,
    pub overdue: i64,
    pub equipment_active: i64,
    pub equipment_inactive: i64,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Dashboard counters; request counts use the same visibility scope as
    /// the list endpoints.
    pub async fn dashboard(&self, actor: &UserClaims) -> AppResult<DashboardStats> {
        let scope = access::scope_for(actor);

        let mut requests = StageCounts::default();
        for (stage, count) in self.repository.requests.count_by_stage(&scope).await? {
            match stage {
                RequestStage::New => requests.new = count,
                RequestStage::InProgress => requests.in_progress = count,
                RequestStage::Repaired => requests.repaired = count,
                RequestStage::Scrap => requests.scrap = count,
            }
        }

        Ok(DashboardStats {
            requests,
            overdue: self.repository.requests.count_overdue(&scope).await?,
            equipment_active: self.repository.equipment.count_by_active(true).await?,
            equipment_inactive: self.repository.equipment.count_by_active(false).await?,
        })
    }
}
