use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::delivery::http::v1::extract::{ApiJson, ApiPath, ApiQuery};
use crate::delivery::http::v1::middleware::AuthenticatedUser;
use crate::domain::trip::Pagination;
use crate::domain::vehicle::{NewVehicle, Vehicle, VehicleChanges};
use crate::usecase::error::UsecaseError;

#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: i64,
    pub name: String,
    pub fuel_type: String,
    pub fuel_consumption: f64,
    pub fuel_price: f64,
    pub created_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(v: Vehicle) -> Self {
        Self {
            id: v.id,
            name: v.name,
            fuel_type: v.fuel_type,
            fuel_consumption: v.fuel_consumption,
            fuel_price: v.fuel_price,
            created_at: v.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub fuel_type: String,
    #[validate(range(exclusive_min = 0.0))]
    pub fuel_consumption: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub fuel_price: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub fuel_type: Option<String>,
    #[validate(range(exclusive_min = 0.0))]
    pub fuel_consumption: Option<f64>,
    #[validate(range(exclusive_min = 0.0))]
    pub fuel_price: Option<f64>,
}

impl From<UpdateVehicleRequest> for VehicleChanges {
    fn from(r: UpdateVehicleRequest) -> Self {
        Self {
            name: r.name,
            fuel_type: r.fuel_type,
            fuel_consumption: r.fuel_consumption,
            fuel_price: r.fuel_price,
        }
    }
}

fn default_vehicle_limit() -> i64 {
    100
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListVehiclesQuery {
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,
    #[serde(default = "default_vehicle_limit")]
    #[validate(range(min = 1, max = 1000))]
    pub limit: i64,
}

#[tracing::instrument(skip(state, payload), fields(user_id = user.user_id))]
pub async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(payload): ApiJson<CreateVehicleRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling create vehicle request");

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(validation_errors.to_string()));
    }

    let vehicle = state
        .vehicles_usecase
        .create_vehicle(NewVehicle {
            user_id: user.user_id,
            name: payload.name,
            fuel_type: payload.fuel_type,
            fuel_consumption: payload.fuel_consumption,
            fuel_price: payload.fuel_price,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(VehicleResponse::from(vehicle))))
}

#[tracing::instrument(skip(state), fields(user_id = user.user_id))]
pub async fn list_vehicles(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(query): ApiQuery<ListVehiclesQuery>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling list vehicles request");

    if let Err(validation_errors) = query.validate() {
        return Err(UsecaseError::Validation(validation_errors.to_string()));
    }

    let vehicles = state
        .vehicles_usecase
        .list_vehicles(
            user.user_id,
            Pagination {
                skip: query.skip,
                limit: query.limit,
            },
        )
        .await?;

    let response: Vec<VehicleResponse> = vehicles.into_iter().map(VehicleResponse::from).collect();
    Ok((StatusCode::OK, Json(response)))
}

#[tracing::instrument(skip(state), fields(user_id = user.user_id))]
pub async fn get_vehicle(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(vehicle_id): ApiPath<i64>,
) -> Result<impl IntoResponse, UsecaseError> {
    let vehicle = state.vehicles_usecase.get_vehicle(user.user_id, vehicle_id).await?;

    Ok((StatusCode::OK, Json(VehicleResponse::from(vehicle))))
}

#[tracing::instrument(skip(state, payload), fields(user_id = user.user_id))]
pub async fn update_vehicle(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(vehicle_id): ApiPath<i64>,
    ApiJson(payload): ApiJson<UpdateVehicleRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!(vehicle_id, "handling update vehicle request");

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(validation_errors.to_string()));
    }

    let vehicle = state
        .vehicles_usecase
        .update_vehicle(user.user_id, vehicle_id, payload.into())
        .await?;

    Ok((StatusCode::OK, Json(VehicleResponse::from(vehicle))))
}

#[tracing::instrument(skip(state), fields(user_id = user.user_id))]
pub async fn delete_vehicle(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(vehicle_id): ApiPath<i64>,
) -> Result<impl IntoResponse, UsecaseError> {
    state.vehicles_usecase.delete_vehicle(user.user_id, vehicle_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
