use crate::domain::trip::{NewTrip, Pagination, Trip, TripPage};
use crate::repository::errors::RepositoryError;
use crate::usecase::contracts::{TripRepository, VehicleRepository};
use crate::usecase::cost::CostEstimator;
use crate::usecase::error::UsecaseError;

fn trip_not_found(trip_id: i64) -> UsecaseError {
    UsecaseError::NotFound(format!("Trip with id {} not found", trip_id))
}

/// A trip recorded by hand. Fuel figures are never taken from the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDraft {
    pub vehicle_id: i64,
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub route_type: String,
}

pub struct TripsUseCase<T, V>
where
    T: TripRepository,
    V: VehicleRepository,
{
    trip_repository: T,
    vehicle_repository: V,
    cost_estimator: CostEstimator,
}

impl<T, V> TripsUseCase<T, V>
where
    T: TripRepository,
    V: VehicleRepository,
{
    pub fn new(trip_repository: T, vehicle_repository: V, cost_estimator: CostEstimator) -> Self {
        Self {
            trip_repository,
            vehicle_repository,
            cost_estimator,
        }
    }

    #[tracing::instrument(skip(self, draft), fields(vehicle_id = draft.vehicle_id))]
    pub async fn create_trip(&self, user_id: i64, draft: TripDraft) -> Result<Trip, UsecaseError> {
        tracing::debug!("creating trip");

        let vehicle = self
            .vehicle_repository
            .find_by_id(draft.vehicle_id)
            .await?
            .ok_or_else(|| {
                UsecaseError::NotFound(format!("Vehicle with id {} not found", draft.vehicle_id))
            })?;

        let cost = self
            .cost_estimator
            .estimate_trip_cost(draft.distance_km, vehicle.fuel_spec());

        let trip = self
            .trip_repository
            .create(&NewTrip {
                vehicle_id: draft.vehicle_id,
                user_id: Some(user_id),
                origin: draft.origin,
                destination: draft.destination,
                distance_km: draft.distance_km,
                duration_minutes: draft.duration_minutes,
                fuel_used_liters: cost.fuel_used_liters,
                fuel_cost: cost.fuel_cost,
                route_type: draft.route_type,
            })
            .await?;

        metrics::counter!("trips_persisted_total", "source" => "direct").increment(1);
        tracing::info!(trip_id = trip.id, "trip created");
        Ok(trip)
    }

    /// Newest first. `page` is `skip / limit + 1`.
    #[tracing::instrument(skip(self))]
    pub async fn list_trips(
        &self,
        user_id: i64,
        vehicle_id: Option<i64>,
        pagination: Pagination,
    ) -> Result<TripPage, UsecaseError> {
        tracing::debug!("listing trips");

        let total = self
            .trip_repository
            .count_by_user_id(user_id, vehicle_id)
            .await?;
        let trips = self
            .trip_repository
            .find_by_user_id(user_id, vehicle_id, pagination)
            .await?;

        tracing::debug!(user_id, total, count = trips.len(), "trips listed");
        Ok(TripPage {
            trips,
            total,
            page: pagination.page(),
            page_size: pagination.limit,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_vehicle_trips(
        &self,
        user_id: i64,
        vehicle_id: i64,
        pagination: Pagination,
    ) -> Result<Vec<Trip>, UsecaseError> {
        tracing::debug!("listing trips for vehicle");

        let trips = self
            .trip_repository
            .find_by_user_id(user_id, Some(vehicle_id), pagination)
            .await?;

        Ok(trips)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_trip(&self, user_id: i64, trip_id: i64) -> Result<Trip, UsecaseError> {
        tracing::debug!("getting trip");

        let trip = self
            .trip_repository
            .find_by_id(trip_id)
            .await?
            .ok_or_else(|| trip_not_found(trip_id))?;

        if trip.user_id != Some(user_id) {
            tracing::warn!("trip access by non-owner");
            return Err(trip_not_found(trip_id));
        }

        Ok(trip)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_trip(&self, user_id: i64, trip_id: i64) -> Result<(), UsecaseError> {
        tracing::debug!("deleting trip");

        self.get_trip(user_id, trip_id).await?;

        self.trip_repository.delete(trip_id).await.map_err(|e| match e {
            RepositoryError::NotFound => trip_not_found(trip_id),
            other => other.into(),
        })?;

        tracing::info!(trip_id, "trip deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::domain::vehicle::Vehicle;
    use crate::usecase::contracts::{MockTripRepository, MockVehicleRepository};

    const OWNER: i64 = 3;
    const STRANGER: i64 = 4;

    fn make_trip(id: i64, user_id: Option<i64>) -> Trip {
        Trip {
            id,
            vehicle_id: 1,
            user_id,
            origin: "Madrid".to_string(),
            destination: "Valencia".to_string(),
            distance_km: 355.0,
            duration_minutes: 210.0,
            fuel_used_liters: 21.3,
            fuel_cost: 34.08,
            route_type: "fastest".to_string(),
            created_at: Utc::now() - Duration::minutes(id),
        }
    }

    fn make_vehicle(id: i64) -> Vehicle {
        Vehicle {
            id,
            user_id: Some(OWNER),
            name: "Ibiza".to_string(),
            fuel_type: "petrol".to_string(),
            fuel_consumption: 6.0,
            fuel_price: 1.6,
            created_at: Utc::now(),
        }
    }

    fn usecase(
        trips: MockTripRepository,
        vehicles: MockVehicleRepository,
    ) -> TripsUseCase<MockTripRepository, MockVehicleRepository> {
        TripsUseCase::new(trips, vehicles, CostEstimator::new())
    }

    #[tokio::test]
    async fn test_create_trip_derives_fuel_figures() {
        let mut mock_trips = MockTripRepository::new();
        let mut mock_vehicles = MockVehicleRepository::new();

        mock_vehicles
            .expect_find_by_id()
            .with(mockall::predicate::eq(1))
            .times(1)
            .returning(|id| Ok(Some(make_vehicle(id))));
        mock_trips
            .expect_create()
            .withf(|t| {
                t.user_id == Some(OWNER)
                    && t.fuel_used_liters == 21.3
                    && t.fuel_cost == 34.08
                    && t.route_type == "scenic"
            })
            .times(1)
            .returning(|t| {
                Ok(Trip {
                    id: 9,
                    vehicle_id: t.vehicle_id,
                    user_id: t.user_id,
                    origin: t.origin.clone(),
                    destination: t.destination.clone(),
                    distance_km: t.distance_km,
                    duration_minutes: t.duration_minutes,
                    fuel_used_liters: t.fuel_used_liters,
                    fuel_cost: t.fuel_cost,
                    route_type: t.route_type.clone(),
                    created_at: Utc::now(),
                })
            });

        let trip = usecase(mock_trips, mock_vehicles)
            .create_trip(
                OWNER,
                TripDraft {
                    vehicle_id: 1,
                    origin: "Madrid".to_string(),
                    destination: "Valencia".to_string(),
                    distance_km: 355.0,
                    duration_minutes: 210.0,
                    route_type: "scenic".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(trip.id, 9);
        assert_eq!(trip.fuel_used_liters, 21.3);
        assert_eq!(trip.fuel_cost, 34.08);
    }

    #[tokio::test]
    async fn test_create_trip_unknown_vehicle() {
        let mut mock_trips = MockTripRepository::new();
        let mut mock_vehicles = MockVehicleRepository::new();

        mock_vehicles.expect_find_by_id().returning(|_| Ok(None));
        mock_trips.expect_create().never();

        let result = usecase(mock_trips, mock_vehicles)
            .create_trip(
                OWNER,
                TripDraft {
                    vehicle_id: 42,
                    origin: "A".to_string(),
                    destination: "B".to_string(),
                    distance_km: 1.0,
                    duration_minutes: 1.0,
                    route_type: "fastest".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(UsecaseError::NotFound(msg)) if msg == "Vehicle with id 42 not found"));
    }

    #[tokio::test]
    async fn test_list_trips_pagination() {
        let mut mock_trips = MockTripRepository::new();
        let mock_vehicles = MockVehicleRepository::new();
        let pagination = Pagination { skip: 0, limit: 50 };

        mock_trips
            .expect_count_by_user_id()
            .with(mockall::predicate::eq(OWNER), mockall::predicate::eq(None))
            .times(1)
            .returning(|_, _| Ok(120));
        mock_trips
            .expect_find_by_user_id()
            .with(
                mockall::predicate::eq(OWNER),
                mockall::predicate::eq(None),
                mockall::predicate::eq(pagination),
            )
            .times(1)
            .returning(|user_id, _, p| Ok((1..=p.limit).map(|id| make_trip(id, Some(user_id))).collect()));

        let page = usecase(mock_trips, mock_vehicles)
            .list_trips(OWNER, None, pagination)
            .await
            .unwrap();

        assert_eq!(page.total, 120);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 50);
        assert_eq!(page.trips.len(), 50);
        // ordering comes from the repository query; the use case must keep it
        assert!(page.trips.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn test_list_trips_second_page_filtered_by_vehicle() {
        let mut mock_trips = MockTripRepository::new();
        let mock_vehicles = MockVehicleRepository::new();

        mock_trips
            .expect_count_by_user_id()
            .with(mockall::predicate::eq(OWNER), mockall::predicate::eq(Some(8)))
            .returning(|_, _| Ok(30));
        mock_trips
            .expect_find_by_user_id()
            .with(
                mockall::predicate::eq(OWNER),
                mockall::predicate::eq(Some(8)),
                mockall::predicate::eq(Pagination { skip: 20, limit: 20 }),
            )
            .returning(|_, _, _| Ok(vec![make_trip(1, Some(OWNER))]));

        let page = usecase(mock_trips, mock_vehicles)
            .list_trips(OWNER, Some(8), Pagination { skip: 20, limit: 20 })
            .await
            .unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 20);
        assert_eq!(page.total, 30);
    }

    #[tokio::test]
    async fn test_list_vehicle_trips() {
        let mut mock_trips = MockTripRepository::new();
        let mock_vehicles = MockVehicleRepository::new();

        mock_trips
            .expect_find_by_user_id()
            .with(
                mockall::predicate::eq(OWNER),
                mockall::predicate::eq(Some(1)),
                mockall::predicate::always(),
            )
            .times(1)
            .returning(|_, _, _| Ok(vec![make_trip(1, Some(OWNER)), make_trip(2, Some(OWNER))]));

        let trips = usecase(mock_trips, mock_vehicles)
            .list_vehicle_trips(OWNER, 1, Pagination { skip: 0, limit: 50 })
            .await
            .unwrap();

        assert_eq!(trips.len(), 2);
    }

    #[tokio::test]
    async fn test_get_trip_of_other_user_is_not_found() {
        let mut mock_trips = MockTripRepository::new();
        let mock_vehicles = MockVehicleRepository::new();

        mock_trips
            .expect_find_by_id()
            .returning(|id| Ok(Some(make_trip(id, Some(OWNER)))));

        let result = usecase(mock_trips, mock_vehicles).get_trip(STRANGER, 6).await;

        assert!(matches!(result, Err(UsecaseError::NotFound(msg)) if msg == "Trip with id 6 not found"));
    }

    #[tokio::test]
    async fn test_unowned_trip_is_not_found() {
        let mut mock_trips = MockTripRepository::new();
        let mock_vehicles = MockVehicleRepository::new();

        mock_trips
            .expect_find_by_id()
            .returning(|id| Ok(Some(make_trip(id, None))));

        let result = usecase(mock_trips, mock_vehicles).get_trip(OWNER, 6).await;

        assert!(matches!(result, Err(UsecaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_trip_success() {
        let mut mock_trips = MockTripRepository::new();
        let mock_vehicles = MockVehicleRepository::new();

        mock_trips
            .expect_find_by_id()
            .returning(|id| Ok(Some(make_trip(id, Some(OWNER)))));
        mock_trips
            .expect_delete()
            .with(mockall::predicate::eq(6))
            .times(1)
            .returning(|_| Ok(()));

        let result = usecase(mock_trips, mock_vehicles).delete_trip(OWNER, 6).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_trip_of_other_user_does_not_delete() {
        let mut mock_trips = MockTripRepository::new();
        let mock_vehicles = MockVehicleRepository::new();

        mock_trips
            .expect_find_by_id()
            .returning(|id| Ok(Some(make_trip(id, Some(OWNER)))));
        mock_trips.expect_delete().never();

        let result = usecase(mock_trips, mock_vehicles).delete_trip(STRANGER, 6).await;

        assert!(matches!(result, Err(UsecaseError::NotFound(_))));
    }
}
