use crate::domain::route::{RouteOption, RoutePlan};
use crate::domain::trip::NewTrip;
use crate::usecase::contracts::{DirectionsProvider, TripRepository, VehicleRepository};
use crate::usecase::cost::CostEstimator;
use crate::usecase::error::UsecaseError;
use crate::usecase::route_calculator::RouteCalculator;

pub struct TripPlannerUseCase<V, T, P>
where
    V: VehicleRepository,
    T: TripRepository,
    P: DirectionsProvider,
{
    vehicle_repository: V,
    trip_repository: T,
    route_calculator: RouteCalculator<P>,
    cost_estimator: CostEstimator,
}

impl<V, T, P> TripPlannerUseCase<V, T, P>
where
    V: VehicleRepository,
    T: TripRepository,
    P: DirectionsProvider,
{
    pub fn new(
        vehicle_repository: V,
        trip_repository: T,
        route_calculator: RouteCalculator<P>,
        cost_estimator: CostEstimator,
    ) -> Self {
        Self {
            vehicle_repository,
            trip_repository,
            route_calculator,
            cost_estimator,
        }
    }

    /// Prices every route the provider returns and stores the primary one
    /// as a trip owned by `user_id`.
    #[tracing::instrument(skip(self))]
    pub async fn plan_trip(
        &self,
        user_id: i64,
        vehicle_id: i64,
        origin: String,
        destination: String,
        alternatives: bool,
    ) -> Result<RoutePlan, UsecaseError> {
        tracing::debug!("planning trip");

        let vehicle = self
            .vehicle_repository
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(vehicle_id, "vehicle for route calculation not found");
                UsecaseError::NotFound(format!("Vehicle with id {} not found", vehicle_id))
            })?;

        let routes = self
            .route_calculator
            .calculate_routes(&origin, &destination, alternatives)
            .await
            .map_err(|e| {
                metrics::counter!("route_calculations_total", "outcome" => "error").increment(1);
                UsecaseError::RouteCalculation(e.to_string())
            })?;

        let spec = vehicle.fuel_spec();
        let mut options = Vec::with_capacity(routes.len());
        let mut trip_id = None;

        for (idx, route) in routes.iter().enumerate() {
            let cost = self.cost_estimator.estimate_trip_cost(route.distance_km, spec);
            options.push(RouteOption::new(route, cost));

            if idx == 0 {
                let trip = self
                    .trip_repository
                    .create(&NewTrip {
                        vehicle_id: vehicle.id,
                        user_id: Some(user_id),
                        origin: route.start_address.clone(),
                        destination: route.end_address.clone(),
                        distance_km: route.distance_km,
                        duration_minutes: route.duration_minutes,
                        fuel_used_liters: cost.fuel_used_liters,
                        fuel_cost: cost.fuel_cost,
                        route_type: route.route_type.to_string(),
                    })
                    .await
                    .map_err(|e| {
                        metrics::counter!("route_calculations_total", "outcome" => "error").increment(1);
                        UsecaseError::RouteCalculation(e.to_string())
                    })?;

                metrics::counter!("trips_persisted_total", "source" => "route_calculation").increment(1);
                tracing::info!(trip_id = trip.id, "primary route saved as trip");
                trip_id = Some(trip.id);
            }
        }

        metrics::counter!("route_calculations_total", "outcome" => "success").increment(1);
        tracing::debug!(route_count = options.len(), ?trip_id, "trip planned");

        Ok(RoutePlan {
            origin,
            destination,
            vehicle_id: vehicle.id,
            routes: options,
            trip_id,
        })
    }
}
