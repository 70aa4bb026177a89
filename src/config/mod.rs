use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_access_token_minutes: i64,
    pub google_maps_api_key: String,
    #[serde(default = "default_routes_api_url")]
    pub routes_api_url: String,
    pub routes_api_timeout_secs: u64,
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Comma-separated list; empty means any origin.
    #[serde(default)]
    pub cors_allowed_origins: String,
    #[serde(default)]
    pub telemetry_enabled: bool,
    #[serde(default = "default_telemetry_service_name")]
    pub telemetry_service_name: String,
    #[serde(default = "default_telemetry_service_version")]
    pub telemetry_service_version: String,
    #[serde(default = "default_telemetry_environment")]
    pub telemetry_environment: String,
    #[serde(default = "default_telemetry_otlp_endpoint")]
    pub telemetry_otlp_endpoint: String,
}

fn default_routes_api_url() -> String {
    "https://routes.googleapis.com/directions/v2:computeRoutes".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_telemetry_service_name() -> String {
    "route-planner-api".to_string()
}

fn default_telemetry_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_telemetry_environment() -> String {
    "production".to_string()
}

fn default_telemetry_otlp_endpoint() -> String {
    "http://localhost:4317".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::default())
    }

    fn from_source(source: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("database_max_connections", 10)?
            .set_default("jwt_access_token_minutes", 30)?
            .set_default("routes_api_timeout_secs", 10)?
            .set_default("port", 8000)?
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }
}
