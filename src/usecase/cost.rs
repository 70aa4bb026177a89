use crate::domain::route::TripCost;
use crate::domain::vehicle::FuelSpec;

/// Rounds the exact binary value to two decimals, so `0.015` (stored as
/// 0.01499...) becomes `0.01`.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CostEstimator;

impl CostEstimator {
    pub fn new() -> Self {
        Self
    }

    pub fn fuel_used_liters(&self, distance_km: f64, consumption_per_100km: f64) -> f64 {
        round2(distance_km / 100.0 * consumption_per_100km)
    }

    pub fn fuel_cost(&self, fuel_used_liters: f64, price_per_liter: f64) -> f64 {
        round2(fuel_used_liters * price_per_liter)
    }

    /// Cost is priced from the already-rounded liters figure.
    pub fn estimate_trip_cost(&self, distance_km: f64, spec: FuelSpec) -> TripCost {
        let fuel_used_liters = self.fuel_used_liters(distance_km, spec.consumption_per_100km);
        let fuel_cost = self.fuel_cost(fuel_used_liters, spec.price_per_liter);

        tracing::trace!(distance_km, fuel_used_liters, fuel_cost, "estimated trip cost");
        TripCost {
            fuel_used_liters,
            fuel_cost,
        }
    }
}
