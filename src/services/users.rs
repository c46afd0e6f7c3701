//! User management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{CreateUser, UpdateUser, User, UserQuery},
    repository::Repository,
};

use super::auth::hash_password;

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        self.repository.users.list(query).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        data.validate()?;
        if let Some(team_id) = data.team_id {
            self.repository.teams.get_by_id(team_id).await?;
        }
        let hash = hash_password(&data.password)?;
        self.repository.users.create(data, &hash).await
    }

    pub async fn update(&self, id: i32, data: &UpdateUser) -> AppResult<User> {
        data.validate()?;
        if let Some(team_id) = data.team_id {
            self.repository.teams.get_by_id(team_id).await?;
        }
        let hash = match &data.password {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };
        self.repository.users.update(id, data, hash.as_deref()).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.users.delete(id).await
    }
}
