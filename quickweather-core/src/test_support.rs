//! Canned provider and fixtures for unit tests.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Mutex;

use crate::{
    error::FetchError,
    model::{
        AirQualityReading, AlertList, Coordinates, ForecastSample, ForecastSeries, HourlySample,
        HourlySeries, WeatherAlert, WeatherSnapshot,
    },
    provider::WeatherProvider,
};

pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap() + chrono::Duration::hours(hour as i64)
}

pub fn paris_snapshot() -> WeatherSnapshot {
    WeatherSnapshot {
        place_name: "Paris".into(),
        temperature_c: 21.0,
        feels_like_c: 20.5,
        humidity_pct: 56,
        wind_speed_mps: 3.6,
        description: "clear sky".into(),
        icon_id: "01d".into(),
        coordinates: Coordinates {
            latitude: 48.85,
            longitude: 2.35,
        },
    }
}

pub fn paris_forecast() -> ForecastSeries {
    ForecastSeries(
        (0..16)
            .map(|i| ForecastSample {
                timestamp: at(i * 3),
                temperature_c: 15.0 + i as f64,
                icon_id: if i % 2 == 0 { "01d".into() } else { "10d".into() },
                description: if i % 2 == 0 { "clear sky".into() } else { "light rain".into() },
            })
            .collect(),
    )
}

pub fn paris_hourly() -> HourlySeries {
    HourlySeries(
        (0..24)
            .map(|i| HourlySample {
                timestamp: at(i),
                temperature_c: 18.0 + (i % 6) as f64,
            })
            .collect(),
    )
}

pub fn paris_alerts() -> AlertList {
    AlertList(vec![WeatherAlert {
        event: "Heat advisory".into(),
        description: "High temperatures expected".into(),
        start: at(10),
        end: at(20),
    }])
}

#[derive(Debug)]
pub struct FakeProvider {
    current: Result<WeatherSnapshot, FetchError>,
    forecast: Result<ForecastSeries, FetchError>,
    alerts: Result<AlertList, FetchError>,
    hourly: Result<HourlySeries, FetchError>,
    air_quality: Result<AirQualityReading, FetchError>,
    calls: Mutex<Vec<(&'static str, String)>>,
}

impl FakeProvider {
    /// Every endpoint succeeds with the Paris fixtures.
    pub fn healthy() -> Self {
        Self {
            current: Ok(paris_snapshot()),
            forecast: Ok(paris_forecast()),
            alerts: Ok(paris_alerts()),
            hourly: Ok(paris_hourly()),
            air_quality: Ok(AirQualityReading { index: 2 }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_current(mut self, r: Result<WeatherSnapshot, FetchError>) -> Self {
        self.current = r;
        self
    }

    pub fn with_forecast(mut self, r: Result<ForecastSeries, FetchError>) -> Self {
        self.forecast = r;
        self
    }

    pub fn with_air_quality(mut self, r: Result<AirQualityReading, FetchError>) -> Self {
        self.air_quality = r;
        self
    }

    /// Endpoint names in call order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().iter().map(|(name, _)| *name).collect()
    }

    /// Arguments passed to one endpoint, in call order.
    pub fn args_of(&self, endpoint: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| *name == endpoint)
            .map(|(_, arg)| arg.clone())
            .collect()
    }

    fn log(&self, endpoint: &'static str, arg: impl ToString) {
        self.calls.lock().unwrap().push((endpoint, arg.to_string()));
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    async fn current_by_place(&self, place: &str) -> Result<WeatherSnapshot, FetchError> {
        self.log("current_by_place", place);
        self.current.clone()
    }

    async fn current_by_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherSnapshot, FetchError> {
        self.log("current_by_coordinates", coordinates);
        self.current.clone()
    }

    async fn forecast(&self, place: &str) -> Result<ForecastSeries, FetchError> {
        self.log("forecast", place);
        self.forecast.clone()
    }

    async fn alerts(&self, place: &str) -> Result<AlertList, FetchError> {
        self.log("alerts", place);
        self.alerts.clone()
    }

    async fn hourly(&self, coordinates: Coordinates) -> Result<HourlySeries, FetchError> {
        self.log("hourly", coordinates);
        self.hourly.clone()
    }

    async fn air_quality(
        &self,
        coordinates: Coordinates,
    ) -> Result<AirQualityReading, FetchError> {
        self.log("air_quality", coordinates);
        self.air_quality.clone()
    }
}
