use std::fmt;

use serde::Serialize;

/// Position-derived label of a provider route: the first is the fastest,
/// later ones are numbered alternatives starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteType {
    Fastest,
    Alternative(usize),
}

impl RouteType {
    pub fn from_position(index: usize) -> Self {
        match index {
            0 => RouteType::Fastest,
            n => RouteType::Alternative(n),
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteType::Fastest => f.write_str("fastest"),
            RouteType::Alternative(n) => write!(f, "alternative_{}", n),
        }
    }
}

/// A route as reported by the routing provider, in provider units.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRoute {
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub polyline: String,
    pub route_type: RouteType,
    pub start_address: String,
    pub end_address: String,
}

/// A provider route normalized to kilometers and minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatedRoute {
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub polyline: String,
    pub route_type: RouteType,
    pub start_address: String,
    pub end_address: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripCost {
    pub fuel_used_liters: f64,
    pub fuel_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOption {
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub fuel_used_liters: f64,
    pub fuel_cost: f64,
    pub route_type: String,
    pub polyline: Option<String>,
}

impl RouteOption {
    pub fn new(route: &CalculatedRoute, cost: TripCost) -> Self {
        Self {
            distance_km: route.distance_km,
            duration_minutes: route.duration_minutes,
            fuel_used_liters: cost.fuel_used_liters,
            fuel_cost: cost.fuel_cost,
            route_type: route.route_type.to_string(),
            polyline: Some(route.polyline.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    pub origin: String,
    pub destination: String,
    pub vehicle_id: i64,
    pub routes: Vec<RouteOption>,
    pub trip_id: Option<i64>,
}
