use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::route::{RawRoute, RouteType};
use crate::usecase::contracts::DirectionsProvider;

const FIELD_MASK: &str =
    "routes.distanceMeters,routes.duration,routes.polyline.encodedPolyline,routes.routeToken";
const PLACEHOLDER_KEY: &str = "your_google_maps_api_key";

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("Google Maps API Configuration Error: {0}")]
    Configuration(String),
    #[error("{0}")]
    Provider(String),
    #[error("No routes found from {origin} to {destination}")]
    NoRoutes { origin: String, destination: String },
    #[error("Routes API request failed: {0}")]
    Transport(String),
}

#[derive(Serialize)]
struct Waypoint<'a> {
    address: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRoutesRequest<'a> {
    origin: Waypoint<'a>,
    destination: Waypoint<'a>,
    travel_mode: &'static str,
    compute_alternative_routes: bool,
    routing_preference: &'static str,
    units: &'static str,
}

#[derive(Deserialize)]
struct ComputeRoutesResponse {
    routes: Option<Vec<ProviderRoute>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderRoute {
    #[serde(default)]
    distance_meters: u64,
    duration: Option<String>,
    polyline: Option<ProviderPolyline>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderPolyline {
    #[serde(default)]
    encoded_polyline: String,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    message: Option<String>,
}

/// Parses a protobuf-style duration such as `"123s"` into whole seconds.
/// Anything without the `s` suffix counts as zero.
pub fn parse_duration(raw: &str) -> u64 {
    let Some(number) = raw.strip_suffix('s') else {
        return 0;
    };
    let digits_end = number
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(number.len());
    number[..digits_end].parse().unwrap_or(0)
}

fn provider_error_message(status: reqwest::StatusCode, body: &str) -> String {
    let mut message = format!("Routes API Error: {}", status.as_u16());
    let provider_message = serde_json::from_str::<ProviderErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error.message);

    match provider_message {
        Some(detail) => message.push_str(&format!(" - {}", detail)),
        None if !body.is_empty() => message.push_str(&format!(" - {}", body)),
        None => {}
    }
    message
}

pub struct GoogleRoutesClient {
    http_client: Client,
    api_url: String,
    api_key: String,
}

impl GoogleRoutesClient {
    pub fn new(api_url: String, api_key: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder()
            .user_agent(concat!("route-planner/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        tracing::info!(%api_url, timeout_secs = timeout.as_secs(), "routes API client created");

        Ok(Self {
            http_client,
            api_url,
            api_key,
        })
    }

    fn check_api_key(&self) -> Result<(), DirectionsError> {
        if self.api_key.trim().is_empty() {
            return Err(DirectionsError::Configuration(
                "API key is not set. Please configure a valid API key.".to_string(),
            ));
        }
        if self.api_key.contains(PLACEHOLDER_KEY) {
            return Err(DirectionsError::Configuration(
                "Default placeholder key in use. Please configure a valid API key.".to_string(),
            ));
        }
        Ok(())
    }
}

impl DirectionsProvider for GoogleRoutesClient {
    #[tracing::instrument(skip(self))]
    async fn get_directions(
        &self,
        origin: &str,
        destination: &str,
        alternatives: bool,
    ) -> Result<Vec<RawRoute>, DirectionsError> {
        self.check_api_key().inspect_err(|e| {
            tracing::error!(error = %e, "routes API key misconfigured");
        })?;

        let request = ComputeRoutesRequest {
            origin: Waypoint { address: origin },
            destination: Waypoint { address: destination },
            travel_mode: "DRIVE",
            compute_alternative_routes: alternatives,
            routing_preference: "TRAFFIC_AWARE",
            units: "METRIC",
        };

        tracing::debug!(url = %self.api_url, "requesting directions");

        let response = self
            .http_client
            .post(&self.api_url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to send request to routes API");
                metrics::counter!("routes_api_requests_total", "outcome" => "transport_error").increment(1);
                DirectionsError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!(error = %e, "failed to read routes API response");
            DirectionsError::Transport(e.to_string())
        })?;

        if !status.is_success() {
            tracing::error!(%status, %body, "routes API returned error");
            metrics::counter!("routes_api_requests_total", "outcome" => "provider_error").increment(1);
            return Err(DirectionsError::Provider(provider_error_message(status, &body)));
        }

        let parsed: ComputeRoutesResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, %body, "failed to parse routes API response");
            DirectionsError::Provider(format!("Failed to parse Routes API response: {}", e))
        })?;

        let routes = match parsed.routes {
            Some(routes) if !routes.is_empty() => routes,
            _ => {
                tracing::warn!("routes API returned no routes");
                metrics::counter!("routes_api_requests_total", "outcome" => "no_routes").increment(1);
                return Err(DirectionsError::NoRoutes {
                    origin: origin.to_string(),
                    destination: destination.to_string(),
                });
            }
        };

        metrics::counter!("routes_api_requests_total", "outcome" => "success").increment(1);
        tracing::debug!(count = routes.len(), "directions received");

        Ok(routes
            .into_iter()
            .enumerate()
            .map(|(idx, route)| RawRoute {
                distance_meters: route.distance_meters,
                duration_seconds: route.duration.as_deref().map(parse_duration).unwrap_or(0),
                polyline: route
                    .polyline
                    .map(|p| p.encoded_polyline)
                    .unwrap_or_default(),
                route_type: RouteType::from_position(idx),
                start_address: origin.to_string(),
                end_address: destination.to_string(),
            })
            .collect())
    }
}
