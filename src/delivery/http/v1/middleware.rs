use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::AppState;
use crate::usecase::error::UsecaseError;

#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub email: String,
}

fn credentials_error() -> UsecaseError {
    UsecaseError::Unauthorized("Could not validate credentials".to_string())
}

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, UsecaseError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| {
            tracing::warn!("missing or invalid authorization header");
            UsecaseError::Unauthorized("Not authenticated".to_string())
        })?;

    let claims = state.jwt_service.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "invalid token");
        credentials_error()
    })?;

    let user_id = claims.user_id().map_err(|e| {
        tracing::warn!(error = %e, sub = %claims.sub, "token subject is not a user id");
        credentials_error()
    })?;

    let authenticated_user = AuthenticatedUser {
        user_id,
        email: claims.email,
    };

    tracing::debug!(?authenticated_user, "user authenticated successfully");
    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}
