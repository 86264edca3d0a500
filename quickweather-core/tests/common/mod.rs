//! Canned OpenWeather responses mounted on a wiremock server.

#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "TEST_KEY";

// 2026-06-01T00:00:00Z
pub const T0: i64 = 1_780_272_000;

pub fn current_json() -> Value {
    json!({
        "coord": { "lon": 2.35, "lat": 48.85 },
        "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "main": { "temp": 21.0, "feels_like": 20.5, "humidity": 56, "pressure": 1016 },
        "wind": { "speed": 3.6, "deg": 250 },
        "dt": T0,
        "name": "Paris",
        "cod": 200
    })
}

pub fn forecast_json() -> Value {
    let list: Vec<Value> = (0..40)
        .map(|i| {
            json!({
                "dt": T0 + i * 3 * 3600,
                "main": { "temp": 15.0 + (i % 8) as f64, "feels_like": 14.0, "humidity": 60 },
                "weather": [{ "description": "light rain", "icon": "10d" }],
                "wind": { "speed": 2.0 }
            })
        })
        .collect();

    json!({ "cod": "200", "cnt": 40, "list": list, "city": { "name": "Paris", "country": "FR" } })
}

pub fn hourly_json() -> Value {
    let hourly: Vec<Value> = (0..48)
        .map(|i| json!({ "dt": T0 + i * 3600, "temp": 18.0 + (i % 5) as f64 }))
        .collect();

    json!({ "lat": 48.85, "lon": 2.35, "hourly": hourly })
}

pub fn alerts_json() -> Value {
    json!({
        "lat": 48.85,
        "lon": 2.35,
        "alerts": [{
            "sender_name": "Meteo-France",
            "event": "Heat advisory",
            "start": T0 + 36_000,
            "end": T0 + 72_000,
            "description": "High temperatures expected"
        }]
    })
}

pub async fn mount_paris(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_json()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "48.85"))
        .and(query_param("lon", "2.35"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_json()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_json()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "Paris", "lat": 48.85, "lon": 2.35, "country": "FR" }
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/onecall"))
        .and(query_param("exclude", "current,minutely,hourly,daily"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alerts_json()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/onecall"))
        .and(query_param("exclude", "current,minutely,daily,alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hourly_json()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "coord": { "lon": 2.35, "lat": 48.85 },
            "list": [{ "main": { "aqi": 2 }, "dt": T0 }]
        })))
        .mount(server)
        .await;
}

pub async fn mount_atlantis(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Atlantis"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

pub async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map(|r| r.len()).unwrap_or(0)
}
