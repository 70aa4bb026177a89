pub mod auth;
pub mod contracts;
pub mod cost;
pub mod error;
pub mod google_routes;
pub mod jwt;
pub mod route_calculator;
pub mod trip_planner;
pub mod trips;
pub mod vehicles;
