use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::delivery::http::v1::extract::ApiJson;
use crate::delivery::http::v1::middleware::AuthenticatedUser;
use crate::domain::route::{RouteOption, RoutePlan};
use crate::usecase::error::UsecaseError;

#[derive(Debug, Deserialize, Validate)]
pub struct CalculateRouteRequest {
    #[validate(length(min = 1))]
    pub origin: String,
    #[validate(length(min = 1))]
    pub destination: String,
    pub vehicle_id: i64,
    #[serde(default)]
    pub alternatives: bool,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub origin: String,
    pub destination: String,
    pub vehicle_id: i64,
    pub routes: Vec<RouteOption>,
    pub trip_id: Option<i64>,
}

impl From<RoutePlan> for RouteResponse {
    fn from(plan: RoutePlan) -> Self {
        Self {
            origin: plan.origin,
            destination: plan.destination,
            vehicle_id: plan.vehicle_id,
            routes: plan.routes,
            trip_id: plan.trip_id,
        }
    }
}

#[tracing::instrument(skip(state, payload), fields(user_id = user.user_id, vehicle_id = payload.vehicle_id))]
pub async fn calculate_route(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(payload): ApiJson<CalculateRouteRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!(alternatives = payload.alternatives, "handling calculate route request");

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(validation_errors.to_string()));
    }

    let plan = state
        .trip_planner
        .plan_trip(
            user.user_id,
            payload.vehicle_id,
            payload.origin,
            payload.destination,
            payload.alternatives,
        )
        .await?;

    tracing::debug!(trip_id = ?plan.trip_id, "route calculated");
    Ok((StatusCode::OK, Json(RouteResponse::from(plan))))
}
