use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    config::DEFAULT_BASE_URL,
    error::FetchError,
    model::{
        AirQualityReading, AlertList, Coordinates, ForecastSample, ForecastSeries, HourlySample,
        HourlySeries, WeatherAlert, WeatherSnapshot,
    },
};

use super::WeatherProvider;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const HOURLY_HORIZON: usize = 24;

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at another host, e.g. a proxy or a mock server.
    pub fn with_base_url(api_key: String, base_url: &str) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        what: &str,
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(what, path, "OpenWeather request");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::transport(format!("{what} request: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::transport(format!("{what} response body: {e}")))?;

        if !status.is_success() {
            return Err(FetchError::provider(format!(
                "{what} request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| FetchError::provider(format!("Failed to parse {what} JSON: {e}")))
    }

    async fn fetch_current(
        &self,
        params: &[(&str, String)],
    ) -> Result<WeatherSnapshot, FetchError> {
        let mut params = params.to_vec();
        params.push(("units", "metric".to_string()));

        let parsed: OwCurrentResponse = self
            .get_json("/data/2.5/weather", &params, "current weather")
            .await?;

        let (description, icon_id) = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| (w.description, w.icon))
            .unwrap_or_else(|| ("Unknown".to_string(), String::new()));

        Ok(WeatherSnapshot {
            place_name: parsed.name,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            description,
            icon_id,
            coordinates: Coordinates {
                latitude: parsed.coord.lat,
                longitude: parsed.coord.lon,
            },
        })
    }

    async fn geocode(&self, place: &str) -> Result<Coordinates, FetchError> {
        let results: Vec<OwGeoResult> = self
            .get_json(
                "/geo/1.0/direct",
                &[("q", place.to_string()), ("limit", "1".to_string())],
                "geocoding",
            )
            .await?;

        results
            .into_iter()
            .next()
            .map(|r| Coordinates {
                latitude: r.lat,
                longitude: r.lon,
            })
            .ok_or_else(|| FetchError::provider(format!("City not found: {place}")))
    }

    async fn one_call(
        &self,
        coordinates: Coordinates,
        exclude: &str,
    ) -> Result<OwOneCallResponse, FetchError> {
        let mut params = coordinate_params(coordinates);
        params.push(("exclude", exclude.to_string()));
        params.push(("units", "metric".to_string()));

        self.get_json("/data/2.5/onecall", &params, "one call").await
    }
}

fn coordinate_params(coordinates: Coordinates) -> Vec<(&'static str, String)> {
    vec![
        ("lat", coordinates.latitude.to_string()),
        ("lon", coordinates.longitude.to_string()),
    ]
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwTemp {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    coord: OwCoord,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwTemp,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwGeoResult {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwAlert {
    event: String,
    #[serde(default)]
    description: String,
    start: i64,
    end: i64,
}

#[derive(Debug, Deserialize)]
struct OwHourly {
    dt: i64,
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwOneCallResponse {
    #[serde(default)]
    alerts: Vec<OwAlert>,
    #[serde(default)]
    hourly: Vec<OwHourly>,
}

#[derive(Debug, Deserialize)]
struct OwAirMain {
    aqi: u8,
}

#[derive(Debug, Deserialize)]
struct OwAirEntry {
    main: OwAirMain,
}

#[derive(Debug, Deserialize)]
struct OwAirResponse {
    list: Vec<OwAirEntry>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_by_place(&self, place: &str) -> Result<WeatherSnapshot, FetchError> {
        self.fetch_current(&[("q", place.to_string())]).await
    }

    async fn current_by_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherSnapshot, FetchError> {
        self.fetch_current(&coordinate_params(coordinates)).await
    }

    async fn forecast(&self, place: &str) -> Result<ForecastSeries, FetchError> {
        let parsed: OwForecastResponse = self
            .get_json(
                "/data/2.5/forecast",
                &[("q", place.to_string()), ("units", "metric".to_string())],
                "forecast",
            )
            .await?;

        if parsed.list.is_empty() {
            return Err(FetchError::provider("Forecast response contained no data"));
        }

        let samples = parsed
            .list
            .into_iter()
            .filter_map(|entry| {
                let timestamp = unix_to_utc(entry.dt)?;
                let (description, icon_id) = entry
                    .weather
                    .into_iter()
                    .next()
                    .map(|w| (w.description, w.icon))
                    .unwrap_or_else(|| ("Unknown".to_string(), String::new()));

                Some(ForecastSample {
                    timestamp,
                    temperature_c: entry.main.temp,
                    icon_id,
                    description,
                })
            })
            .collect();

        Ok(ForecastSeries(samples))
    }

    async fn alerts(&self, place: &str) -> Result<AlertList, FetchError> {
        let coordinates = self.geocode(place).await?;
        let parsed = self
            .one_call(coordinates, "current,minutely,hourly,daily")
            .await?;

        let alerts = parsed
            .alerts
            .into_iter()
            .filter_map(|a| match (unix_to_utc(a.start), unix_to_utc(a.end)) {
                (Some(start), Some(end)) => Some(WeatherAlert {
                    event: a.event,
                    description: a.description,
                    start,
                    end,
                }),
                _ => {
                    tracing::debug!(
                        event = %a.event,
                        start = a.start,
                        end = a.end,
                        "Dropping alert with unrepresentable time range"
                    );
                    None
                }
            })
            .collect();

        Ok(AlertList(alerts))
    }

    async fn hourly(&self, coordinates: Coordinates) -> Result<HourlySeries, FetchError> {
        let parsed = self
            .one_call(coordinates, "current,minutely,daily,alerts")
            .await?;

        if parsed.hourly.is_empty() {
            return Err(FetchError::provider("Hourly forecast response contained no data"));
        }

        let samples = parsed
            .hourly
            .into_iter()
            .filter_map(|h| {
                Some(HourlySample {
                    timestamp: unix_to_utc(h.dt)?,
                    temperature_c: h.temp,
                })
            })
            .take(HOURLY_HORIZON)
            .collect();

        Ok(HourlySeries(samples))
    }

    async fn air_quality(
        &self,
        coordinates: Coordinates,
    ) -> Result<AirQualityReading, FetchError> {
        let parsed: OwAirResponse = self
            .get_json(
                "/data/2.5/air_pollution",
                &coordinate_params(coordinates),
                "air quality",
            )
            .await?;

        let aqi = parsed
            .list
            .first()
            .map(|entry| entry.main.aqi)
            .ok_or_else(|| FetchError::provider("Air quality response contained no data"))?;

        AirQualityReading::new(aqi)
            .ok_or_else(|| FetchError::provider(format!("Air quality index {aqi} out of range")))
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
