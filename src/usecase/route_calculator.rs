use crate::domain::route::{CalculatedRoute, RawRoute};
use crate::usecase::contracts::DirectionsProvider;
use crate::usecase::cost::round2;
use crate::usecase::google_routes::DirectionsError;

pub fn meters_to_kilometers(meters: u64) -> f64 {
    round2(meters as f64 / 1000.0)
}

pub fn seconds_to_minutes(seconds: u64) -> f64 {
    round2(seconds as f64 / 60.0)
}

fn normalize(route: RawRoute) -> CalculatedRoute {
    CalculatedRoute {
        distance_km: meters_to_kilometers(route.distance_meters),
        duration_minutes: seconds_to_minutes(route.duration_seconds),
        polyline: route.polyline,
        route_type: route.route_type,
        start_address: route.start_address,
        end_address: route.end_address,
    }
}

pub struct RouteCalculator<P>
where
    P: DirectionsProvider,
{
    provider: P,
}

impl<P> RouteCalculator<P>
where
    P: DirectionsProvider,
{
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Routes come back in provider order; nothing is re-sorted.
    #[tracing::instrument(skip(self))]
    pub async fn calculate_routes(
        &self,
        origin: &str,
        destination: &str,
        alternatives: bool,
    ) -> Result<Vec<CalculatedRoute>, DirectionsError> {
        tracing::debug!("calculating routes");

        let raw_routes = self
            .provider
            .get_directions(origin, destination, alternatives)
            .await?;

        let routes: Vec<CalculatedRoute> = raw_routes.into_iter().map(normalize).collect();

        tracing::debug!(count = routes.len(), "routes normalized");
        Ok(routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::route::RouteType;
    use crate::usecase::contracts::MockDirectionsProvider;

    fn raw(distance_meters: u64, duration_seconds: u64, idx: usize) -> RawRoute {
        RawRoute {
            distance_meters,
            duration_seconds,
            polyline: format!("poly{}", idx),
            route_type: RouteType::from_position(idx),
            start_address: "Lyon".to_string(),
            end_address: "Paris".to_string(),
        }
    }

    #[test]
    fn test_unit_conversions() {
        assert_eq!(meters_to_kilometers(1000), 1.0);
        assert_eq!(meters_to_kilometers(0), 0.0);
        assert_eq!(meters_to_kilometers(15432), 15.43);
        assert_eq!(meters_to_kilometers(12340), 12.34);
        assert_eq!(meters_to_kilometers(15), 0.01);
        assert_eq!(seconds_to_minutes(60), 1.0);
        assert_eq!(seconds_to_minutes(5400), 90.0);
        assert_eq!(seconds_to_minutes(125), 2.08);
    }

    #[tokio::test]
    async fn test_calculate_routes_normalizes_and_keeps_order() {
        let mut mock_provider = MockDirectionsProvider::new();

        // the first route is the longest; order must still be preserved
        mock_provider
            .expect_get_directions()
            .with(
                mockall::predicate::eq("Lyon"),
                mockall::predicate::eq("Paris"),
                mockall::predicate::eq(true),
            )
            .times(1)
            .returning(|_, _, _| Ok(vec![raw(465_000, 16_200, 0), raw(390_500, 18_000, 1), raw(470_120, 15_000, 2)]));

        let calculator = RouteCalculator::new(mock_provider);
        let routes = calculator.calculate_routes("Lyon", "Paris", true).await.unwrap();

        assert_eq!(routes.len(), 3);
        let labels: Vec<String> = routes.iter().map(|r| r.route_type.to_string()).collect();
        assert_eq!(labels, vec!["fastest", "alternative_1", "alternative_2"]);
        assert_eq!(routes[0].distance_km, 465.0);
        assert_eq!(routes[0].duration_minutes, 270.0);
        assert_eq!(routes[1].distance_km, 390.5);
        assert_eq!(routes[2].distance_km, 470.12);
        assert_eq!(routes[2].duration_minutes, 250.0);
        assert_eq!(routes[1].polyline, "poly1");
        assert_eq!(routes[0].start_address, "Lyon");
    }

    #[tokio::test]
    async fn test_calculate_routes_propagates_provider_error() {
        let mut mock_provider = MockDirectionsProvider::new();

        mock_provider
            .expect_get_directions()
            .times(1)
            .returning(|_, _, _| Err(DirectionsError::Provider("Routes API Error: 500".to_string())));

        let calculator = RouteCalculator::new(mock_provider);
        let result = calculator.calculate_routes("A", "B", false).await;

        assert!(matches!(result, Err(DirectionsError::Provider(_))));
    }

    #[tokio::test]
    async fn test_each_call_hits_provider() {
        let mut mock_provider = MockDirectionsProvider::new();

        mock_provider
            .expect_get_directions()
            .times(2)
            .returning(|_, _, _| Ok(vec![raw(1000, 60, 0)]));

        let calculator = RouteCalculator::new(mock_provider);
        calculator.calculate_routes("A", "B", false).await.unwrap();
        let routes = calculator.calculate_routes("A", "B", false).await.unwrap();

        assert_eq!(routes[0].distance_km, 1.0);
        assert_eq!(routes[0].duration_minutes, 1.0);
    }
}
