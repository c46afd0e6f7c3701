//! Maintenance team endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::team::{CreateTeam, MaintenanceTeam, TeamDetails, UpdateTeam},
};

use super::AuthenticatedUser;

/// List maintenance teams
#[utoipa::path(
    get,
    path = "/teams",
    tag = "teams",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Team list", body = Vec<MaintenanceTeam>)
    )
)]
pub async fn list_teams(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<MaintenanceTeam>>> {
    let teams = state.services.teams.list().await?;
    Ok(Json(teams))
}

/// Get team with members
#[utoipa::path(
    get,
    path = "/teams/{id}",
    tag = "teams",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Team details", body = TeamDetails)
    )
)]
pub async fn get_team(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<TeamDetails>> {
    let team = state.services.teams.get_by_id(id).await?;
    Ok(Json(team))
}

/// Create team
#[utoipa::path(
    post,
    path = "/teams",
    tag = "teams",
    security(("bearer_auth" = [])),
    request_body = CreateTeam,
    responses(
        (status = 201, description = "Team created", body = MaintenanceTeam)
    )
)]
pub async fn create_team(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateTeam>,
) -> AppResult<(StatusCode, Json<MaintenanceTeam>)> {
    claims.require_supervisor()?;
    let team = state.services.teams.create(&data).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// Update team
#[utoipa::path(
    put,
    path = "/teams/{id}",
    tag = "teams",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Team ID")),
    request_body = UpdateTeam,
    responses(
        (status = 200, description = "Team updated", body = MaintenanceTeam)
    )
)]
pub async fn update_team(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateTeam>,
) -> AppResult<Json<MaintenanceTeam>> {
    claims.require_supervisor()?;
    let team = state.services.teams.update(id, &data).await?;
    Ok(Json(team))
}

/// Delete team
#[utoipa::path(
    delete,
    path = "/teams/{id}",
    tag = "teams",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Team ID")),
    responses(
        (status = 204, description = "Team deleted")
    )
)]
pub async fn delete_team(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;
    state.services.teams.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
