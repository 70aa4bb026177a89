pub mod auth;
pub mod extract;
pub mod health;
pub mod middleware;
pub mod routes;
pub mod trips;
pub mod vehicles;
