use crate::{
    domain::route::RawRoute,
    domain::trip::{NewTrip, Pagination, Trip},
    domain::user::User,
    domain::vehicle::{NewVehicle, Vehicle, VehicleChanges},
    repository::errors::RepositoryError,
    usecase::google_routes::DirectionsError,
};

#[cfg_attr(test, mockall::automock)]
pub trait VehicleRepository: Send + Sync {
    async fn create(&self, vehicle: &NewVehicle) -> Result<Vehicle, RepositoryError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Vehicle>, RepositoryError>;
    async fn find_by_user_id(&self, user_id: i64, pagination: Pagination) -> Result<Vec<Vehicle>, RepositoryError>;
    /// Writes only the supplied columns of a row owned by `user_id`;
    /// `None` when no such row exists.
    async fn update(
        &self,
        id: i64,
        user_id: i64,
        changes: &VehicleChanges,
    ) -> Result<Option<Vehicle>, RepositoryError>;
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait TripRepository: Send + Sync {
    async fn create(&self, trip: &NewTrip) -> Result<Trip, RepositoryError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Trip>, RepositoryError>;
    async fn find_by_user_id(
        &self,
        user_id: i64,
        vehicle_id: Option<i64>,
        pagination: Pagination,
    ) -> Result<Vec<Trip>, RepositoryError>;
    async fn count_by_user_id(&self, user_id: i64, vehicle_id: Option<i64>) -> Result<i64, RepositoryError>;
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError>;
}

/// Source of driving directions between two free-form addresses.
#[cfg_attr(test, mockall::automock)]
pub trait DirectionsProvider: Send + Sync {
    async fn get_directions(
        &self,
        origin: &str,
        destination: &str,
        alternatives: bool,
    ) -> Result<Vec<RawRoute>, DirectionsError>;
}
