//! End-to-end dashboard behaviour: live fetch, offline fallback, failed lookup.

mod common;

use quickweather_core::{
    Connectivity, Dashboard, DataSource, FetchError, FileStore, LocationQuery, NetworkMonitor,
    OpenWeatherClient, TemperatureUnit,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{API_KEY, mount_atlantis, mount_paris, request_count};

async fn setup() -> (MockServer, tempfile::TempDir) {
    let server = MockServer::start().await;
    mount_paris(&server).await;
    mount_atlantis(&server).await;
    (server, tempfile::tempdir().unwrap())
}

fn open(
    server: &MockServer,
    dir: &tempfile::TempDir,
    status: Connectivity,
) -> Dashboard<OpenWeatherClient, FileStore> {
    let provider = OpenWeatherClient::with_base_url(API_KEY.to_string(), &server.uri()).unwrap();
    Dashboard::open(provider, FileStore::new(dir.path()), NetworkMonitor::new(status)).unwrap()
}

#[tokio::test]
async fn paris_online_then_offline() {
    let (server, dir) = setup().await;

    let mut dash = open(&server, &dir, Connectivity::Online);
    let live = dash.fetch_all(LocationQuery::place("Paris")).await;

    assert_eq!(live.source, DataSource::Live);
    assert_eq!(live.succeeded().len(), 5);
    assert_eq!(live.weather.as_ref().unwrap().coordinates.latitude, 48.85);
    assert_eq!(live.weather.as_ref().unwrap().coordinates.longitude, 2.35);
    assert_eq!(dash.history(), ["Paris"]);
    drop(dash);

    // Fresh process, network gone.
    let before = request_count(&server).await;
    let mut dash = open(&server, &dir, Connectivity::Offline);
    let cached = dash.fetch_all(LocationQuery::place("Paris")).await;

    assert_eq!(request_count(&server).await, before);
    assert_eq!(cached.source, DataSource::Cache);
    assert_eq!(cached.weather, live.weather);
    assert_eq!(cached.forecast, live.forecast);
    assert_eq!(cached.hourly, live.hourly);
    assert_eq!(cached.alerts, live.alerts);
    assert_eq!(cached.air_quality, live.air_quality);
    assert_eq!(dash.history(), ["Paris"]);
}

#[tokio::test]
async fn atlantis_fails_without_touching_history() {
    let (server, dir) = setup().await;
    let mut dash = open(&server, &dir, Connectivity::Online);

    let result = dash.fetch_all(LocationQuery::place("Atlantis")).await;

    assert!(matches!(result.weather, Err(FetchError::Provider(_))));
    assert_eq!(result.forecast, Err(FetchError::NoCoordinates));
    assert_eq!(result.hourly, Err(FetchError::NoCoordinates));
    assert_eq!(result.air_quality, Err(FetchError::NoCoordinates));
    // Alerts were attempted on the raw name and failed on their own.
    assert_eq!(result.alerts, Err(FetchError::Provider("City not found: Atlantis".into())));
    assert!(result.failure_message().is_some());
    assert!(dash.history().is_empty());
}

#[tokio::test]
async fn failed_query_keeps_previous_cache() {
    let (server, dir) = setup().await;
    let mut dash = open(&server, &dir, Connectivity::Online);
    let paris = dash.fetch_all(LocationQuery::place("Paris")).await;
    dash.fetch_all(LocationQuery::place("Atlantis")).await;
    drop(dash);

    let mut offline = open(&server, &dir, Connectivity::Offline);
    let cached = offline.fetch_all(LocationQuery::place("Atlantis")).await;

    assert_eq!(cached.weather, paris.weather);
    assert_eq!(cached.alerts, paris.alerts);
    assert_eq!(offline.history(), ["Paris"]);
}

#[tokio::test]
async fn empty_forecast_keeps_last_good_forecast() {
    let (server, dir) = setup().await;
    let mut dash = open(&server, &dir, Connectivity::Online);
    let paris = dash.fetch_all(LocationQuery::place("Paris")).await;
    drop(dash);

    // Same city later, but the forecast endpoint answers with an empty list.
    let degraded = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cod": "200", "list": [] })))
        .with_priority(1)
        .mount(&degraded)
        .await;
    mount_paris(&degraded).await;

    let mut dash = open(&degraded, &dir, Connectivity::Online);
    let live = dash.fetch_all(LocationQuery::place("Paris")).await;
    assert!(matches!(live.forecast, Err(FetchError::Provider(_))));
    assert!(live.weather.is_ok());
    drop(dash);

    let mut offline = open(&degraded, &dir, Connectivity::Offline);
    let cached = offline.fetch_all(LocationQuery::place("Paris")).await;

    assert_eq!(cached.forecast, paris.forecast);
    assert_eq!(cached.forecast.as_ref().unwrap().0.len(), 40);
}

#[tokio::test]
async fn my_location_resolves_and_fetches_weather_once() {
    let (server, dir) = setup().await;
    let mut dash = open(&server, &dir, Connectivity::Online);

    let result = dash.fetch_all(LocationQuery::coordinates(48.85, 2.35)).await;

    assert_eq!(result.place_name(), Some("Paris"));
    assert_eq!(dash.history(), ["Paris"]);

    let requests = server.received_requests().await.unwrap();
    let weather_calls = requests
        .iter()
        .filter(|r| r.url.path() == "/data/2.5/weather")
        .count();
    assert_eq!(weather_calls, 1);
}

#[tokio::test]
async fn view_converts_for_display() {
    let (server, dir) = setup().await;
    let mut dash = open(&server, &dir, Connectivity::Online);
    dash.fetch_all(LocationQuery::place("Paris")).await;

    let view = dash.view(TemperatureUnit::Fahrenheit).unwrap();

    let current = view.current.unwrap();
    assert!((current.temperature - 69.8).abs() < 1e-9);
    assert_eq!(view.hourly.len(), 24);
    assert_eq!(view.alerts.len(), 1);
    assert_eq!(view.air_quality.map(|a| a.label), Some("Fair"));
}
