use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::delivery::http::v1::extract::{ApiJson, ApiPath, ApiQuery};
use crate::delivery::http::v1::middleware::AuthenticatedUser;
use crate::domain::trip::{DEFAULT_ROUTE_TYPE, Pagination, Trip};
use crate::usecase::error::UsecaseError;
use crate::usecase::trips::TripDraft;

#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub id: i64,
    pub vehicle_id: i64,
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub fuel_used_liters: f64,
    pub fuel_cost: f64,
    pub route_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<Trip> for TripResponse {
    fn from(t: Trip) -> Self {
        Self {
            id: t.id,
            vehicle_id: t.vehicle_id,
            origin: t.origin,
            destination: t.destination,
            distance_km: t.distance_km,
            duration_minutes: t.duration_minutes,
            fuel_used_liters: t.fuel_used_liters,
            fuel_cost: t.fuel_cost,
            route_type: t.route_type,
            created_at: t.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TripListResponse {
    pub trips: Vec<TripResponse>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

fn default_route_type() -> String {
    DEFAULT_ROUTE_TYPE.to_string()
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTripRequest {
    pub vehicle_id: i64,
    #[validate(length(min = 1))]
    pub origin: String,
    #[validate(length(min = 1))]
    pub destination: String,
    #[validate(range(min = 0.0))]
    pub distance_km: f64,
    #[validate(range(min = 0.0))]
    pub duration_minutes: f64,
    #[serde(default = "default_route_type")]
    pub route_type: String,
}

fn default_trip_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize, Validate)]
pub struct ListTripsQuery {
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,
    #[serde(default = "default_trip_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
    pub vehicle_id: Option<i64>,
}

impl ListTripsQuery {
    fn pagination(&self) -> Pagination {
        Pagination {
            skip: self.skip,
            limit: self.limit,
        }
    }
}

#[tracing::instrument(skip(state, payload), fields(user_id = user.user_id))]
pub async fn create_trip(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(payload): ApiJson<CreateTripRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling create trip request");

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(?validation_errors, "validation failed");
        return Err(UsecaseError::Validation(validation_errors.to_string()));
    }

    let trip = state
        .trips_usecase
        .create_trip(
            user.user_id,
            TripDraft {
                vehicle_id: payload.vehicle_id,
                origin: payload.origin,
                destination: payload.destination,
                distance_km: payload.distance_km,
                duration_minutes: payload.duration_minutes,
                route_type: payload.route_type,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(TripResponse::from(trip))))
}

#[tracing::instrument(skip(state), fields(user_id = user.user_id))]
pub async fn list_trips(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiQuery(query): ApiQuery<ListTripsQuery>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling list trips request");

    if let Err(validation_errors) = query.validate() {
        return Err(UsecaseError::Validation(validation_errors.to_string()));
    }

    let page = state
        .trips_usecase
        .list_trips(user.user_id, query.vehicle_id, query.pagination())
        .await?;

    Ok((
        StatusCode::OK,
        Json(TripListResponse {
            trips: page.trips.into_iter().map(TripResponse::from).collect(),
            total: page.total,
            page: page.page,
            page_size: page.page_size,
        }),
    ))
}

#[tracing::instrument(skip(state, query), fields(user_id = user.user_id))]
pub async fn list_vehicle_trips(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(vehicle_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<ListTripsQuery>,
) -> Result<impl IntoResponse, UsecaseError> {
    if let Err(validation_errors) = query.validate() {
        return Err(UsecaseError::Validation(validation_errors.to_string()));
    }

    let trips = state
        .trips_usecase
        .list_vehicle_trips(user.user_id, vehicle_id, query.pagination())
        .await?;

    let response: Vec<TripResponse> = trips.into_iter().map(TripResponse::from).collect();
    Ok((StatusCode::OK, Json(response)))
}

#[tracing::instrument(skip(state), fields(user_id = user.user_id))]
pub async fn get_trip(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(trip_id): ApiPath<i64>,
) -> Result<impl IntoResponse, UsecaseError> {
    let trip = state.trips_usecase.get_trip(user.user_id, trip_id).await?;

    Ok((StatusCode::OK, Json(TripResponse::from(trip))))
}

#[tracing::instrument(skip(state), fields(user_id = user.user_id))]
pub async fn delete_trip(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(trip_id): ApiPath<i64>,
) -> Result<impl IntoResponse, UsecaseError> {
    state.trips_usecase.delete_trip(user.user_id, trip_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
