use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    domain::trip::{NewTrip, Pagination, Trip},
    domain::user::User,
    domain::vehicle::{NewVehicle, Vehicle, VehicleChanges},
    repository::errors::RepositoryError,
    usecase::contracts::{TripRepository, UserRepository, VehicleRepository},
};

pub struct PostgresVehicleRepository {
    pool: PgPool,
}

impl PostgresVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl VehicleRepository for PostgresVehicleRepository {
    #[tracing::instrument(skip(self, vehicle), fields(user_id = vehicle.user_id))]
    async fn create(&self, vehicle: &NewVehicle) -> Result<Vehicle, RepositoryError> {
        tracing::debug!("inserting vehicle");

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (name, fuel_type, fuel_consumption, fuel_price, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, name, fuel_type, fuel_consumption, fuel_price, created_at
            "#,
        )
        .bind(&vehicle.name)
        .bind(&vehicle.fuel_type)
        .bind(vehicle.fuel_consumption)
        .bind(vehicle.fuel_price)
        .bind(vehicle.user_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(vehicle_id = vehicle.id, "vehicle inserted");
        Ok(vehicle)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Vehicle>, RepositoryError> {
        tracing::debug!("finding vehicle by id");

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, user_id, name, fuel_type, fuel_consumption, fuel_price, created_at
            FROM vehicles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_user_id(&self, user_id: i64, pagination: Pagination) -> Result<Vec<Vehicle>, RepositoryError> {
        tracing::debug!("finding vehicles by user_id");

        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, user_id, name, fuel_type, fuel_consumption, fuel_price, created_at
            FROM vehicles
            WHERE user_id = $1
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(pagination.limit)
        .bind(pagination.skip)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(count = vehicles.len(), "found vehicles");
        Ok(vehicles)
    }

    #[tracing::instrument(skip(self, changes))]
    async fn update(
        &self,
        id: i64,
        user_id: i64,
        changes: &VehicleChanges,
    ) -> Result<Option<Vehicle>, RepositoryError> {
        tracing::debug!(?changes, "updating vehicle");

        // unsupplied columns keep whatever value the row holds at write time
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET name = COALESCE($3, name),
                fuel_type = COALESCE($4, fuel_type),
                fuel_consumption = COALESCE($5, fuel_consumption),
                fuel_price = COALESCE($6, fuel_price)
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, fuel_type, fuel_consumption, fuel_price, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(changes.name.as_deref())
        .bind(changes.fuel_type.as_deref())
        .bind(changes.fuel_consumption)
        .bind(changes.fuel_price)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        tracing::debug!("deleting vehicle");

        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Newest first; `id` breaks ties between rows sharing a timestamp.
const LIST_TRIPS_SQL: &str = r#"
    SELECT id, vehicle_id, user_id, origin, destination, distance_km,
           duration_minutes, fuel_used_liters, fuel_cost, route_type, created_at
    FROM trips
    WHERE user_id = $1 AND ($2::BIGINT IS NULL OR vehicle_id = $2)
    ORDER BY created_at DESC, id DESC
    LIMIT $3 OFFSET $4
"#;

pub struct PostgresTripRepository {
    pool: PgPool,
}

impl PostgresTripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TripRepository for PostgresTripRepository {
    #[tracing::instrument(skip(self, trip), fields(vehicle_id = trip.vehicle_id, route_type = %trip.route_type))]
    async fn create(&self, trip: &NewTrip) -> Result<Trip, RepositoryError> {
        tracing::debug!("inserting trip");

        let trip = sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips (vehicle_id, user_id, origin, destination, distance_km,
                               duration_minutes, fuel_used_liters, fuel_cost, route_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, vehicle_id, user_id, origin, destination, distance_km,
                      duration_minutes, fuel_used_liters, fuel_cost, route_type, created_at
            "#,
        )
        .bind(trip.vehicle_id)
        .bind(trip.user_id)
        .bind(&trip.origin)
        .bind(&trip.destination)
        .bind(trip.distance_km)
        .bind(trip.duration_minutes)
        .bind(trip.fuel_used_liters)
        .bind(trip.fuel_cost)
        .bind(&trip.route_type)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(trip_id = trip.id, "trip inserted");
        Ok(trip)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Trip>, RepositoryError> {
        tracing::debug!("finding trip by id");

        let trip = sqlx::query_as::<_, Trip>(
            r#"
            SELECT id, vehicle_id, user_id, origin, destination, distance_km,
                   duration_minutes, fuel_used_liters, fuel_cost, route_type, created_at
            FROM trips
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(trip)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_user_id(
        &self,
        user_id: i64,
        vehicle_id: Option<i64>,
        pagination: Pagination,
    ) -> Result<Vec<Trip>, RepositoryError> {
        tracing::debug!("finding trips by user_id");

        let trips = sqlx::query_as::<_, Trip>(LIST_TRIPS_SQL)
            .bind(user_id)
            .bind(vehicle_id)
            .bind(pagination.limit)
            .bind(pagination.skip)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(count = trips.len(), "found trips");
        Ok(trips)
    }

    #[tracing::instrument(skip(self))]
    async fn count_by_user_id(&self, user_id: i64, vehicle_id: Option<i64>) -> Result<i64, RepositoryError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM trips
            WHERE user_id = $1 AND ($2::BIGINT IS NULL OR vehicle_id = $2)
            "#,
        )
        .bind(user_id)
        .bind(vehicle_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        tracing::debug!("deleting trip");

        let result = sqlx::query("DELETE FROM trips WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip(self, password_hash))]
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, RepositoryError> {
        tracing::debug!("inserting user");

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
