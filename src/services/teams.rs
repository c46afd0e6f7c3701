//! Maintenance team service

use validator::Validate;

use crate::{
    error::AppResult,
    models::team::{CreateTeam, MaintenanceTeam, TeamDetails, UpdateTeam},
    repository::Repository,
};

#[derive(Clone)]
pub struct TeamsService {
    repository: Repository,
}

impl TeamsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<MaintenanceTeam>> {
        self.repository.teams.list().await
    }

    /// Get a team with its resolved member list
    pub async fn get_by_id(&self, id: i32) -> AppResult<TeamDetails> {
        let team = self.repository.teams.get_by_id(id).await?;
        let members = self.repository.users.list_by_team(id).await?;
        Ok(TeamDetails::from_team(team, members))
    }

    pub async fn create(&self, data: &CreateTeam) -> AppResult<MaintenanceTeam> {
        data.validate()?;
        if let Some(lead_id) = data.team_lead_id {
            self.repository.users.get_by_id(lead_id).await?;
        }
        self.repository.teams.create(data).await
    }

    pub async fn update(&self, id: i32, data: &UpdateTeam) -> AppResult<MaintenanceTeam> {
        data.validate()?;
        if let Some(lead_id) = data.team_lead_id {
            self.repository.users.get_by_id(lead_id).await?;
        }
        self.repository.teams.update(id, data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.teams.delete(id).await
    }
}
