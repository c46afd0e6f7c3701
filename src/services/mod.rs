//! Business logic services

pub mod access;
pub mod audit;
pub mod auth;
pub mod equipment;
pub mod requests;
pub mod stats;
pub mod teams;
pub mod users;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub users: users::UsersService,
    pub teams: teams::TeamsService,
    pub equipment: equipment::EquipmentService,
    pub requests: requests::RequestsService,
    pub stats: stats::StatsService,
    pub audit: audit::AuditService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        let audit = audit::AuditService::new(repository.clone());
        let equipment = equipment::EquipmentService::new(repository.clone());
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            users: users::UsersService::new(repository.clone()),
            teams: teams::TeamsService::new(repository.clone()),
            requests: requests::RequestsService::new(
                repository.clone(),
                equipment.clone(),
                audit.clone(),
            ),
            equipment,
            stats: stats::StatsService::new(repository),
            audit,
        }
    }
}
