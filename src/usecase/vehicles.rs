use crate::domain::trip::Pagination;
use crate::domain::vehicle::{NewVehicle, Vehicle, VehicleChanges};
use crate::repository::errors::RepositoryError;
use crate::usecase::contracts::VehicleRepository;
use crate::usecase::error::UsecaseError;

fn vehicle_not_found(vehicle_id: i64) -> UsecaseError {
    UsecaseError::NotFound(format!("Vehicle with id {} not found", vehicle_id))
}

pub struct VehiclesUseCase<V>
where
    V: VehicleRepository,
{
    vehicle_repository: V,
}

impl<V> VehiclesUseCase<V>
where
    V: VehicleRepository,
{
    pub fn new(vehicle_repository: V) -> Self {
        Self { vehicle_repository }
    }

    #[tracing::instrument(skip(self, vehicle), fields(user_id = %vehicle.user_id, name = %vehicle.name))]
    pub async fn create_vehicle(&self, vehicle: NewVehicle) -> Result<Vehicle, UsecaseError> {
        tracing::debug!("creating vehicle");

        let vehicle = self.vehicle_repository.create(&vehicle).await?;

        tracing::info!(vehicle_id = vehicle.id, "vehicle created");
        Ok(vehicle)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_vehicles(
        &self,
        user_id: i64,
        pagination: Pagination,
    ) -> Result<Vec<Vehicle>, UsecaseError> {
        tracing::debug!("listing vehicles");

        let vehicles = self
            .vehicle_repository
            .find_by_user_id(user_id, pagination)
            .await?;

        tracing::debug!(user_id, count = vehicles.len(), "vehicles listed");
        Ok(vehicles)
    }

    /// Another user's vehicle is reported exactly like a missing one.
    #[tracing::instrument(skip(self))]
    pub async fn get_vehicle(&self, user_id: i64, vehicle_id: i64) -> Result<Vehicle, UsecaseError> {
        tracing::debug!("getting vehicle");

        let vehicle = self
            .vehicle_repository
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| vehicle_not_found(vehicle_id))?;

        if !vehicle.is_owned_by(user_id) {
            tracing::warn!("vehicle access by non-owner");
            return Err(vehicle_not_found(vehicle_id));
        }

        Ok(vehicle)
    }

    #[tracing::instrument(skip(self, changes))]
    pub async fn update_vehicle(
        &self,
        user_id: i64,
        vehicle_id: i64,
        changes: VehicleChanges,
    ) -> Result<Vehicle, UsecaseError> {
        tracing::debug!(?changes, "updating vehicle");

        let vehicle = self
            .vehicle_repository
            .update(vehicle_id, user_id, &changes)
            .await?
            .ok_or_else(|| {
                tracing::warn!("vehicle missing or owned by another user");
                vehicle_not_found(vehicle_id)
            })?;

        tracing::info!(vehicle_id, "vehicle updated");
        Ok(vehicle)
    }

    /// Hard delete; trips that reference the vehicle are left as they are.
    #[tracing::instrument(skip(self))]
    pub async fn delete_vehicle(&self, user_id: i64, vehicle_id: i64) -> Result<(), UsecaseError> {
        tracing::debug!("deleting vehicle");

        self.get_vehicle(user_id, vehicle_id).await?;

        self.vehicle_repository.delete(vehicle_id).await.map_err(|e| match e {
            RepositoryError::NotFound => vehicle_not_found(vehicle_id),
            other => other.into(),
        })?;

        tracing::info!(vehicle_id, "vehicle deleted");
        Ok(())
    }
}
