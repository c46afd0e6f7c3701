//! Dashboard statistics endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, services::stats::DashboardStats};

use super::AuthenticatedUser;

/// Role-scoped dashboard counters
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard counters", body = DashboardStats)
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<DashboardStats>> {
    let stats = state.services.stats.dashboard(&claims).await?;
    Ok(Json(stats))
}
