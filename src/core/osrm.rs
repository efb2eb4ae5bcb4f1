//! OSRM routing client
//!
//! Issues single road-distance lookups against an OSRM-compatible routing
//! service. The client performs no retries and no fallback; failures are
//! surfaced to the caller, which owns the recovery policy.

use std::time::Duration;

use log::debug;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;

use crate::core::error::{Error, Result};

/// Global HTTP client shared by all routing lookups
static GLOBAL_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .tcp_keepalive(Duration::from_secs(60))
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(20)
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("roadnet/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to create HTTP client")
});

/// Typed OSRM route response; only `routes[0].distance` is consumed
#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    /// Road-network travel distance in meters
    distance: f64,
}

/// Client for an OSRM-style `/route/v1/driving` endpoint
pub struct RoutingClient {
    base_url: String,
    timeout: Duration,
}

impl RoutingClient {
    /// Create a client for the given service base URL with a per-request
    /// timeout. The timeout bounds every lookup so one slow remote call
    /// cannot stall a whole resolution batch.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, timeout }
    }

    /// Look up the driving distance in meters between two coordinates.
    ///
    /// Sends one GET request; a 2xx response with at least one route yields
    /// `routes[0].distance`. Everything else is an error: non-success status
    /// and transport failures map to [`Error::RemoteUnavailable`], a success
    /// response with an empty route list to [`Error::NoRouteFound`].
    pub async fn lookup(&self, lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<f64> {
        // OSRM takes lon,lat ordering
        let url = format!(
            "{}/route/v1/driving/{lon1},{lat1};{lon2},{lat2}?overview=false",
            self.base_url
        );
        debug!("routing lookup: {url}");

        let response = GLOBAL_CLIENT.get(&url).timeout(self.timeout).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::RemoteUnavailable(format!(
                "routing request failed: {status}"
            )));
        }

        let body: RouteResponse = response.json().await?;
        match body.routes.first() {
            Some(route) => Ok(route.distance),
            None => Err(Error::NoRouteFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_lookup_success_takes_first_route() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/route/v1/driving/13.405,52.52;13.41,52.53"))
            .and(query_param("overview", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": "Ok",
                "routes": [
                    { "distance": 3200.0, "duration": 240.0 },
                    { "distance": 4100.0, "duration": 300.0 }
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = RoutingClient::new(mock_server.uri(), TIMEOUT);
        let meters = client.lookup(52.52, 13.405, 52.53, 13.41).await.unwrap();
        assert_eq!(meters, 3200.0);
    }

    #[tokio::test]
    async fn test_lookup_non_success_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = RoutingClient::new(mock_server.uri(), TIMEOUT);
        let err = client.lookup(52.52, 13.405, 52.53, 13.41).await.unwrap_err();
        assert!(matches!(err, Error::RemoteUnavailable(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_lookup_empty_route_list() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "code": "NoRoute", "routes": [] })),
            )
            .mount(&mock_server)
            .await;

        let client = RoutingClient::new(mock_server.uri(), TIMEOUT);
        let err = client.lookup(52.52, 13.405, 52.53, 13.41).await.unwrap_err();
        assert!(matches!(err, Error::NoRouteFound), "got {err:?}");
    }

    #[tokio::test]
    async fn test_lookup_absent_routes_field() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": "Ok" })))
            .mount(&mock_server)
            .await;

        let client = RoutingClient::new(mock_server.uri(), TIMEOUT);
        let err = client.lookup(52.52, 13.405, 52.53, 13.41).await.unwrap_err();
        assert!(matches!(err, Error::NoRouteFound), "got {err:?}");
    }

    #[tokio::test]
    async fn test_lookup_respects_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "routes": [{ "distance": 1.0 }] }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let client = RoutingClient::new(mock_server.uri(), Duration::from_millis(100));
        let err = client.lookup(52.52, 13.405, 52.53, 13.41).await.unwrap_err();
        assert!(matches!(err, Error::RemoteUnavailable(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_lookup_connection_refused() {
        // Nothing listens here; transport error, not a panic
        let client = RoutingClient::new("http://127.0.0.1:1", TIMEOUT);
        let err = client.lookup(52.52, 13.405, 52.53, 13.41).await.unwrap_err();
        assert!(matches!(err, Error::RemoteUnavailable(_)), "got {err:?}");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = RoutingClient::new("http://localhost:5000/", TIMEOUT);
        assert_eq!(client.base_url, "http://localhost:5000");
    }
}
