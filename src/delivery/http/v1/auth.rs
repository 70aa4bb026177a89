use std::sync::Arc;

use axum::{
    Extension, Form, Json,
    extract::{FromRequest, Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::delivery::http::v1::extract::ApiJson;
use crate::delivery::http::v1::middleware::AuthenticatedUser;
use crate::domain::user::User;
use crate::usecase::error::UsecaseError;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Login credentials, accepted either as an urlencoded form (`username`)
/// or as JSON (`username` or `email`).
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(alias = "email")]
    pub username: String,
    pub password: String,
}

impl<S> FromRequest<S> for TokenRequest
where
    S: Send + Sync,
{
    type Rejection = UsecaseError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        if is_json {
            let Json(credentials) = Json::<TokenRequest>::from_request(req, state).await?;
            Ok(credentials)
        } else {
            let Form(credentials) = Form::<TokenRequest>::from_request(req, state).await?;
            Ok(credentials)
        }
    }
}

#[tracing::instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling register request");

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(validation_errors.to_string()));
    }

    let user = state
        .auth_usecase
        .register(&payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[tracing::instrument(skip(state, credentials), fields(username = %credentials.username))]
pub async fn token(
    State(state): State<Arc<AppState>>,
    credentials: TokenRequest,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling token request");

    let access_token = state
        .auth_usecase
        .login(&credentials.username, &credentials.password)
        .await?;

    Ok((
        StatusCode::OK,
        Json(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        }),
    ))
}

#[tracing::instrument(skip(state), fields(user_id = user.user_id))]
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    let user = state.auth_usecase.me(user.user_id).await?;

    Ok((StatusCode::OK, Json(UserResponse::from(user))))
}
