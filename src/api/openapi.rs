//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{error, models, services};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::health::health_check,
        crate::api::health::readiness_check,
        crate::api::auth::login,
        crate::api::auth::me,
        crate::api::users::list_users,
        crate::api::users::get_user,
        crate::api::users::create_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,
        crate::api::teams::list_teams,
        crate::api::teams::get_team,
        crate::api::teams::create_team,
        crate::api::teams::update_team,
        crate::api::teams::delete_team,
        crate::api::equipment::list_equipment,
        crate::api::equipment::get_equipment,
        crate::api::equipment::get_auto_fill,
        crate::api::equipment::create_equipment,
        crate::api::equipment::update_equipment,
        crate::api::equipment::deactivate_equipment,
        crate::api::equipment::delete_equipment,
        crate::api::requests::create_request,
        crate::api::requests::list_requests,
        crate::api::requests::list_overdue_requests,
        crate::api::requests::list_calendar_requests,
        crate::api::requests::get_request,
        crate::api::requests::update_request_stage,
        crate::api::requests::assign_request_technician,
        crate::api::requests::update_request_resolution,
        crate::api::requests::delete_request,
        crate::api::stats::get_stats,
    ),
    components(schemas(
        error::ErrorResponse,
        crate::api::health::HealthResponse,
        crate::api::auth::LoginRequest,
        crate::api::auth::LoginResponse,
        models::enums::Role,
        models::enums::OwnershipType,
        models::enums::RequestType,
        models::enums::RequestStage,
        models::enums::Priority,
        models::user::User,
        models::user::UserShort,
        models::user::CreateUser,
        models::user::UpdateUser,
        models::team::MaintenanceTeam,
        models::team::TeamDetails,
        models::team::CreateTeam,
        models::team::UpdateTeam,
        models::equipment::Equipment,
        models::equipment::EquipmentAutoFill,
        models::equipment::CreateEquipment,
        models::equipment::UpdateEquipment,
        models::request::RequestDetails,
        models::request::CreateRequest,
        models::request::UpdateStage,
        models::request::AssignTechnician,
        models::request::UpdateResolution,
        services::stats::StageCounts,
        services::stats::DashboardStats,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Service health"),
        (name = "auth", description = "Authentication"),
        (name = "users", description = "User management"),
        (name = "teams", description = "Maintenance teams"),
        (name = "equipment", description = "Equipment inventory"),
        (name = "requests", description = "Maintenance request workflow"),
        (name = "stats", description = "Dashboards"),
    ),
    info(
        title = "GearGuard API",
        description = "Maintenance management REST API"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Router serving the OpenAPI document and Swagger UI
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
