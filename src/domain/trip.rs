use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ROUTE_TYPE: &str = "fastest";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Trip {
    pub id: i64,
    pub vehicle_id: i64,
    pub user_id: Option<i64>,
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub fuel_used_liters: f64,
    pub fuel_cost: f64,
    pub route_type: String,
    pub created_at: DateTime<Utc>,
}

/// A trip row before the store assigns its id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub vehicle_id: i64,
    pub user_id: Option<i64>,
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub fuel_used_liters: f64,
    pub fuel_cost: f64,
    pub route_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    pub skip: i64,
    pub limit: i64,
}

impl Pagination {
    /// 1-based page number, `skip / limit + 1`.
    pub fn page(&self) -> i64 {
        self.skip / self.limit + 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripPage {
    pub trips: Vec<Trip>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}
