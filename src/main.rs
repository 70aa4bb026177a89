mod config;
mod delivery;
mod domain;
mod repository;
mod telemetry;
mod usecase;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sqlx::PgPool;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::repository::postgres::{
    PostgresTripRepository, PostgresUserRepository, PostgresVehicleRepository, create_pool,
};
use crate::usecase::auth::AuthUseCase;
use crate::usecase::cost::CostEstimator;
use crate::usecase::google_routes::GoogleRoutesClient;
use crate::usecase::jwt::JwtService;
use crate::usecase::route_calculator::RouteCalculator;
use crate::usecase::trip_planner::TripPlannerUseCase;
use crate::usecase::trips::TripsUseCase;
use crate::usecase::vehicles::VehiclesUseCase;

pub struct AppState {
    pub vehicles_usecase: VehiclesUseCase<PostgresVehicleRepository>,
    pub trips_usecase: TripsUseCase<PostgresTripRepository, PostgresVehicleRepository>,
    pub trip_planner:
        TripPlannerUseCase<PostgresVehicleRepository, PostgresTripRepository, GoogleRoutesClient>,
    pub auth_usecase: AuthUseCase<PostgresUserRepository>,
    pub jwt_service: JwtService,
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        config: &AppConfig,
        metrics_handle: PrometheusHandle,
    ) -> anyhow::Result<Self> {
        let jwt_service = JwtService::new(config.jwt_secret.clone(), config.jwt_access_token_minutes);
        let cost_estimator = CostEstimator::new();

        let routes_client = GoogleRoutesClient::new(
            config.routes_api_url.clone(),
            config.google_maps_api_key.clone(),
            Duration::from_secs(config.routes_api_timeout_secs),
        )
        .context("failed to build routes API client")?;

        Ok(Self {
            vehicles_usecase: VehiclesUseCase::new(PostgresVehicleRepository::new(pool.clone())),
            trips_usecase: TripsUseCase::new(
                PostgresTripRepository::new(pool.clone()),
                PostgresVehicleRepository::new(pool.clone()),
                cost_estimator,
            ),
            trip_planner: TripPlannerUseCase::new(
                PostgresVehicleRepository::new(pool.clone()),
                PostgresTripRepository::new(pool.clone()),
                RouteCalculator::new(routes_client),
                cost_estimator,
            ),
            auth_usecase: AuthUseCase::new(PostgresUserRepository::new(pool), jwt_service.clone()),
            jwt_service,
            metrics_handle,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let telemetry_config = telemetry::TelemetryConfig::from(&config);
    let tracer_provider = telemetry::init(
        config.telemetry_enabled.then_some(&telemetry_config),
        env_filter,
    )?;

    tracing::info!(telemetry_enabled = config.telemetry_enabled, "starting route planner");

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")?;
    metrics_process::Collector::default().describe();
    tracing::info!("prometheus metrics initialized");

    let pool = create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("failed to create database pool")?;
    tracing::info!("database pool created");

    sqlx::migrate!().run(&pool).await?;
    tracing::info!("database migrations applied");

    let shared_state = Arc::new(AppState::new(pool, &config, metrics_handle)?);
    let router = delivery::http::router(shared_state, &config);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;
    tracing::info!(%bind_address, "route planner listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    telemetry::shutdown(tracer_provider);

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("ctrl-c received, shutting down"),
        _ = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
