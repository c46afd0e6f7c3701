//! Maintenance request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::RequestStage,
        request::{
            AssignTechnician, CalendarQuery, CreateRequest, RequestDetails, RequestQuery,
            UpdateResolution, UpdateStage,
        },
    },
};

use super::AuthenticatedUser;

/// Create a maintenance request
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    request_body = CreateRequest,
    responses(
        (status = 201, description = "Request created", body = RequestDetails),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Equipment not found"),
        (status = 409, description = "Equipment is inactive")
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateRequest>,
) -> AppResult<(StatusCode, Json<RequestDetails>)> {
    let request = state.services.requests.create(&data, &claims).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// List maintenance requests visible to the caller
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(RequestQuery),
    responses(
        (status = 200, description = "Request list", body = Vec<RequestDetails>)
    )
)]
pub async fn list_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<RequestQuery>,
) -> AppResult<Json<Vec<RequestDetails>>> {
    let requests = state.services.requests.list(&claims, &query).await?;
    Ok(Json(requests))
}

/// List overdue requests visible to the caller
#[utoipa::path(
    get,
    path = "/requests/overdue",
    tag = "requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Overdue requests", body = Vec<RequestDetails>)
    )
)]
pub async fn list_overdue_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<RequestDetails>>> {
    let requests = state.services.requests.list_overdue(&claims).await?;
    Ok(Json(requests))
}

/// Calendar view of scheduled requests
#[utoipa::path(
    get,
    path = "/requests/calendar",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(CalendarQuery),
    responses(
        (status = 200, description = "Scheduled requests in range", body = Vec<RequestDetails>)
    )
)]
pub async fn list_calendar_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(range): Query<CalendarQuery>,
) -> AppResult<Json<Vec<RequestDetails>>> {
    let requests = state.services.requests.list_calendar(&claims, &range).await?;
    Ok(Json(requests))
}

/// Get a maintenance request
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request details", body = RequestDetails),
        (status = 403, description = "Not visible to the caller"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<RequestDetails>> {
    let request = state.services.requests.get(id, &claims).await?;
    Ok(Json(request))
}

/// Move a request to a new workflow stage
///
/// Scrapping deactivates the linked equipment, so a Scrap transition must
/// carry `confirm: true`.
#[utoipa::path(
    put,
    path = "/requests/{id}/stage",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    request_body = UpdateStage,
    responses(
        (status = 200, description = "Stage updated", body = RequestDetails),
        (status = 400, description = "Scrap transition not confirmed"),
        (status = 403, description = "Role gate failed"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Transition not permitted by the workflow"),
        (status = 500, description = "Cascade failure")
    )
)]
pub async fn update_request_stage(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateStage>,
) -> AppResult<Json<RequestDetails>> {
    if data.stage == RequestStage::Scrap && !data.confirm.unwrap_or(false) {
        return Err(AppError::BadRequest(
            "Scrapping a request deactivates its equipment; set confirm = true to proceed"
                .to_string(),
        ));
    }
    let request = state
        .services
        .requests
        .update_stage(id, data.stage, &claims)
        .await?;
    Ok(Json(request))
}

/// Assign a technician to a request
#[utoipa::path(
    put,
    path = "/requests/{id}/technician",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    request_body = AssignTechnician,
    responses(
        (status = 200, description = "Technician assigned", body = RequestDetails),
        (status = 403, description = "Admin or manager role required"),
        (status = 404, description = "Request or technician not found")
    )
)]
pub async fn assign_request_technician(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<AssignTechnician>,
) -> AppResult<Json<RequestDetails>> {
    let request = state
        .services
        .requests
        .assign_technician(id, data.technician_id, &claims)
        .await?;
    Ok(Json(request))
}

/// Record resolution details
#[utoipa::path(
    put,
    path = "/requests/{id}/resolution",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    request_body = UpdateResolution,
    responses(
        (status = 200, description = "Resolution updated", body = RequestDetails),
        (status = 403, description = "Role gate failed"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn update_request_resolution(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateResolution>,
) -> AppResult<Json<RequestDetails>> {
    let request = state
        .services
        .requests
        .update_resolution(id, &data, &claims)
        .await?;
    Ok(Json(request))
}

/// Delete a maintenance request
#[utoipa::path(
    delete,
    path = "/requests/{id}",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 204, description = "Request deleted"),
        (status = 403, description = "Admin or manager role required"),
        (status = 404, description = "Request not found")
    )
)]
pub async fn delete_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.requests.delete(id, &claims).await?;
    Ok(StatusCode::NO_CONTENT)
}
