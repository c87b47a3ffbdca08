use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use thiserror::Error;

use crate::model::{LocationCandidate, WeatherSnapshot};

const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Failure of a weatherapi.com call. Detail is kept for the diagnostic log;
/// screen controllers reduce any variant to "no data" plus a generic alert.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to weatherapi.com failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weatherapi.com returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode weatherapi.com response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Abstraction over the weather backend, the seam the screen controllers
/// and the favorites reconciler are written against.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Fetch a `days`-day forecast for a city name.
    async fn forecast(&self, city: &str, days: u8) -> Result<WeatherSnapshot, ApiError>;

    /// Free-text location search.
    async fn search(&self, query: &str) -> Result<Vec<LocationCandidate>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the client at a different host. Used by tests.
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self { api_key, base_url, http: Client::new() }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        // Query parameters go through reqwest and are URL-encoded, so city
        // names with spaces or diacritics are safe.
        let res = self.http.get(&url).query(query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status { status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(ApiError::Decode)
    }
}

#[async_trait]
impl WeatherSource for WeatherApiClient {
    async fn forecast(&self, city: &str, days: u8) -> Result<WeatherSnapshot, ApiError> {
        let days = days.to_string();

        self.get_json(
            "forecast.json",
            &[
                ("key", self.api_key.as_str()),
                ("q", city),
                ("days", days.as_str()),
                ("aqi", "no"),
                ("alerts", "no"),
            ],
        )
        .await
    }

    async fn search(&self, query: &str) -> Result<Vec<LocationCandidate>, ApiError> {
        self.get_json("search.json", &[("key", self.api_key.as_str()), ("q", query)]).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX { format!("{}...", &body[..MAX]) } else { body.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FORECAST_BODY: &str = r#"{
        "location": { "name": "Paris", "country": "France" },
        "current": {
            "temp_c": 18.0,
            "condition": { "text": "Sunny" },
            "wind_kph": 9.4,
            "humidity": 52
        },
        "forecast": {
            "forecastday": [
                {
                    "date": "2024-05-01",
                    "astro": { "sunrise": "06:30 AM" },
                    "day": { "avgtemp_c": 16.2, "condition": { "text": "Sunny" } }
                }
            ]
        }
    }"#;

    fn client_for(server: &MockServer) -> WeatherApiClient {
        WeatherApiClient::with_base_url("TESTKEY".to_string(), server.uri())
    }

    #[tokio::test]
    async fn forecast_sends_expected_query_and_parses() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .and(query_param("key", "TESTKEY"))
            .and(query_param("q", "Paris"))
            .and(query_param("days", "7"))
            .and(query_param("aqi", "no"))
            .and(query_param("alerts", "no"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(FORECAST_BODY, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let snapshot =
            client_for(&server).forecast("Paris", 7).await.expect("forecast should succeed");

        assert_eq!(snapshot.location.name, "Paris");
        assert_eq!(snapshot.current.temp_c, 18.0);
        assert_eq!(snapshot.forecast.forecastday.len(), 1);
    }

    #[tokio::test]
    async fn forecast_encodes_city_names_with_spaces() {
        let server = MockServer::start().await;

        // wiremock matches against the decoded parameter value.
        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .and(query_param("q", "New York"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(FORECAST_BODY, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).forecast("New York", 1).await.expect("forecast should succeed");
    }

    #[tokio::test]
    async fn search_returns_candidates() {
        let server = MockServer::start().await;

        let body = r#"[
            { "name": "Paris", "country": "France" },
            { "name": "Paris", "country": "United States of America" }
        ]"#;

        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("key", "TESTKEY"))
            .and(query_param("q", "par"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .mount(&server)
            .await;

        let candidates = client_for(&server).search("par").await.expect("search should succeed");

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "Paris");
    }

    #[tokio::test]
    async fn search_empty_result_is_ok_and_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search.json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
            .mount(&server)
            .await;

        let candidates =
            client_for(&server).search("zzzzzz").await.expect("search should succeed");
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_becomes_status_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_raw(r#"{"error":{"message":"API key invalid"}}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).forecast("Paris", 7).await.unwrap_err();

        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert!(body.contains("API key invalid"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_becomes_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<html>oops</html>", "text/html"))
            .mount(&server)
            .await;

        let err = client_for(&server).forecast("Paris", 7).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn truncate_body_caps_long_bodies() {
        let long = "x".repeat(500);
        let truncated = truncate_body(&long);
        assert!(truncated.len() < 500);
        assert!(truncated.ends_with("..."));

        assert_eq!(truncate_body("short"), "short");
    }
}
