use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::domain::user::User;
use crate::repository::errors::RepositoryError;
use crate::usecase::contracts::UserRepository;
use crate::usecase::error::UsecaseError;
use crate::usecase::jwt::JwtService;

const BAD_CREDENTIALS: &str = "Incorrect email or password";

pub fn hash_password(password: &str) -> Result<String, UsecaseError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UsecaseError::Internal(format!("failed to hash password: {}", e)))
}

/// A stored hash that cannot be parsed counts as a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is unreadable");
            false
        }
    }
}

pub struct AuthUseCase<U>
where
    U: UserRepository,
{
    user_repository: U,
    jwt_service: JwtService,
}

impl<U> AuthUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repository: U, jwt_service: JwtService) -> Self {
        Self {
            user_repository,
            jwt_service,
        }
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<User, UsecaseError> {
        tracing::debug!("registering user");

        if self.user_repository.find_by_email(email).await?.is_some() {
            tracing::warn!("email already registered");
            return Err(UsecaseError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_password(password)?;

        // a concurrent registration can still win the unique index
        let user = self
            .user_repository
            .create(email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => UsecaseError::Conflict("Email already registered".to_string()),
                other => other.into(),
            })?;

        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }

    /// Returns a bearer access token.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, UsecaseError> {
        tracing::debug!("login attempt");

        let user = self
            .user_repository
            .find_by_email(email)
            .await?
            .filter(|user| verify_password(password, &user.password_hash))
            .ok_or_else(|| {
                tracing::warn!("login rejected");
                UsecaseError::Unauthorized(BAD_CREDENTIALS.to_string())
            })?;

        let token = self
            .jwt_service
            .generate_access_token(user.id, &user.email)
            .map_err(|e| UsecaseError::Internal(e.to_string()))?;

        tracing::info!(user_id = user.id, "access token issued");
        Ok(token)
    }

    #[tracing::instrument(skip(self))]
    pub async fn me(&self, user_id: i64) -> Result<User, UsecaseError> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| UsecaseError::Unauthorized("Could not validate credentials".to_string()))
    }
}
