use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Liters per 100 km and price per liter, the pair every cost estimate needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelSpec {
    pub consumption_per_100km: f64,
    pub price_per_liter: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub fuel_type: String,
    pub fuel_consumption: f64,
    pub fuel_price: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicle {
    pub user_id: i64,
    pub name: String,
    pub fuel_type: String,
    pub fuel_consumption: f64,
    pub fuel_price: f64,
}

/// Partial update: `None` leaves the stored column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleChanges {
    pub name: Option<String>,
    pub fuel_type: Option<String>,
    pub fuel_consumption: Option<f64>,
    pub fuel_price: Option<f64>,
}

impl Vehicle {
    pub fn fuel_spec(&self) -> FuelSpec {
        FuelSpec {
            consumption_per_100km: self.fuel_consumption,
            price_per_liter: self.fuel_price,
        }
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == Some(user_id)
    }
}
