use axum::{
    Json,
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use thiserror::Error;

use crate::repository::errors::RepositoryError;

const GENERIC_INTERNAL_DETAIL: &str = "An internal server error occurred";

#[derive(Debug, Error)]
pub enum UsecaseError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Error calculating route: {0}")]
    RouteCalculation(String),

    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<RepositoryError> for UsecaseError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => UsecaseError::NotFound("Resource not found".to_string()),
            RepositoryError::Conflict(msg) => UsecaseError::Conflict(msg),
            RepositoryError::DatabaseError(msg) => UsecaseError::Internal(msg),
        }
    }
}

impl From<anyhow::Error> for UsecaseError {
    fn from(e: anyhow::Error) -> Self {
        UsecaseError::Internal(e.to_string())
    }
}

impl From<JsonRejection> for UsecaseError {
    fn from(rejection: JsonRejection) -> Self {
        UsecaseError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for UsecaseError {
    fn from(rejection: QueryRejection) -> Self {
        UsecaseError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for UsecaseError {
    fn from(rejection: PathRejection) -> Self {
        UsecaseError::Validation(rejection.body_text())
    }
}

impl From<FormRejection> for UsecaseError {
    fn from(rejection: FormRejection) -> Self {
        UsecaseError::Validation(rejection.body_text())
    }
}

impl UsecaseError {
    pub fn status(&self) -> StatusCode {
        match self {
            UsecaseError::NotFound(_) => StatusCode::NOT_FOUND,
            UsecaseError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            UsecaseError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            UsecaseError::Conflict(_) => StatusCode::CONFLICT,
            UsecaseError::RouteCalculation(_) | UsecaseError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            UsecaseError::RouteCalculation(msg) => ErrorBody {
                detail: self.to_string(),
                error: Some(msg.clone()),
            },
            UsecaseError::Internal(msg) => ErrorBody {
                detail: GENERIC_INTERNAL_DETAIL.to_string(),
                error: Some(msg.clone()),
            },
            _ => ErrorBody {
                detail: self.to_string(),
                error: None,
            },
        }
    }
}

impl IntoResponse for UsecaseError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            UsecaseError::RouteCalculation(_) | UsecaseError::Internal(_) => {
                tracing::error!(error = %self, "internal error");
            }
            UsecaseError::NotFound(_) => {
                tracing::warn!(error = %self, "resource not found");
            }
            UsecaseError::Unauthorized(_) => {
                tracing::warn!(error = %self, "unauthorized");
            }
            _ => {
                tracing::debug!(error = %self);
            }
        }

        (self.status(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn response_json(error: UsecaseError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) =
            response_json(UsecaseError::NotFound("Vehicle with id 3 not found".to_string())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Vehicle with id 3 not found");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_route_calculation_body_keeps_provider_message() {
        let (status, body) = response_json(UsecaseError::RouteCalculation(
            "Routes API Error: 403 - API key not valid".to_string(),
        ))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["detail"],
            "Error calculating route: Routes API Error: 403 - API key not valid"
        );
        assert_eq!(body["error"], "Routes API Error: 403 - API key not valid");
    }

    #[tokio::test]
    async fn test_internal_body_is_generic_with_raw_error() {
        let (status, body) =
            response_json(UsecaseError::Internal("connection reset".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], GENERIC_INTERNAL_DETAIL);
        assert_eq!(body["error"], "connection reset");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(UsecaseError::Validation(String::new()).status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(UsecaseError::Unauthorized(String::new()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(UsecaseError::Conflict(String::new()).status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_from_repository_error() {
        assert!(matches!(
            UsecaseError::from(RepositoryError::NotFound),
            UsecaseError::NotFound(_)
        ));
        assert!(matches!(
            UsecaseError::from(RepositoryError::DatabaseError("boom".to_string())),
            UsecaseError::Internal(msg) if msg == "boom"
        ));
    }
}
