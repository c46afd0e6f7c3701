//! Authentication service

use chrono::{Duration, Utc};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::Role,
        user::{User, UserClaims},
    },
    repository::Repository,
};

/// Hash a password with argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    use argon2::password_hash::{rand_core::OsRng, SaltString};
    use argon2::{Argon2, PasswordHasher};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored argon2 hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate a user and issue a JWT
    pub async fn login(&self, login: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_login(login)
            .await?
            .filter(|user| verify_password(password, &user.password))
            .ok_or_else(|| AppError::Authentication("Invalid login or password".to_string()))?;

        let token = self
            .claims_for(&user)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Token creation failed: {}", e)))?;

        Ok((token, user))
    }

    /// Build claims for a user; role and team membership are resolved here so
    /// the access filter never goes back to the database.
    pub fn claims_for(&self, user: &User) -> UserClaims {
        let now = Utc::now();
        UserClaims {
            sub: user.login.clone(),
            user_id: user.id,
            role: user.role,
            team_id: user.team_id,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.config.jwt_expiration_hours as i64)).timestamp(),
        }
    }

    /// Create the default administrator account on an empty users table
    pub async fn ensure_default_admin(&self) -> AppResult<()> {
        if self.repository.users.count().await? > 0 {
            return Ok(());
        }

        let hash = hash_password("admin")?;
        let admin = crate::models::user::CreateUser {
            login: "admin".to_string(),
            password: String::new(), // repository stores the hash, not this field
            firstname: None,
            lastname: None,
            email: None,
            role: Some(Role::Admin),
            team_id: None,
        };
        self.repository.users.create(&admin, &hash).await?;
        tracing::warn!(
            "Created default administrator account 'admin' with password 'admin'; change it immediately"
        );
        Ok(())
    }
}
