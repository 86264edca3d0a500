use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// What the user asked for: a typed place name or a position from the geolocation sensor.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Place(String),
    Coordinates(Coordinates),
}

impl LocationQuery {
    pub fn place(name: impl Into<String>) -> Self {
        LocationQuery::Place(name.into())
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        LocationQuery::Coordinates(Coordinates { latitude, longitude })
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::Place(name) => f.write_str(name),
            LocationQuery::Coordinates(c) => c.fmt(f),
        }
    }
}

/// Canonical place name, plus the current conditions if resolving already fetched them.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub name: String,
    pub prefetched: Option<WeatherSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub place_name: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub description: String,
    pub icon_id: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub icon_id: String,
    pub description: String,
}

/// Three-hourly samples over the provider's multi-day horizon, oldest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastSeries(pub Vec<ForecastSample>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HourlySeries(pub Vec<HourlySample>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub event: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Active alerts in provider order. Empty means nothing is active.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AlertList(pub Vec<WeatherAlert>);

/// Ordinal air quality index, 1 (good) to 5 (very poor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirQualityReading {
    pub index: u8,
}

impl AirQualityReading {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(index: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&index)
            .then_some(Self { index })
    }
}

/// Unit of independent fetch, cache and failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Weather,
    Forecast,
    Hourly,
    Alerts,
    AirQuality,
}

impl DataKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Weather => "weather",
            DataKind::Forecast => "forecast",
            DataKind::Hourly => "hourly",
            DataKind::Alerts => "alerts",
            DataKind::AirQuality => "air_quality",
        }
    }

    pub const fn all() -> &'static [DataKind] {
        &[
            DataKind::Weather,
            DataKind::Forecast,
            DataKind::Hourly,
            DataKind::Alerts,
            DataKind::AirQuality,
        ]
    }

    /// Key the last good payload of this kind is persisted under.
    pub fn storage_key(&self) -> String {
        format!("cache.{}", self.as_str())
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lower = value.to_lowercase().replace('-', "_");

        match lower.as_str() {
            "weather" => Ok(DataKind::Weather),
            "forecast" => Ok(DataKind::Forecast),
            "hourly" => Ok(DataKind::Hourly),
            "alerts" => Ok(DataKind::Alerts),
            "air_quality" | "aqi" => Ok(DataKind::AirQuality),
            _ => Err(anyhow::anyhow!(
                "Unknown data kind '{value}'. Supported kinds: weather, forecast, hourly, alerts, air_quality."
            )),
        }
    }
}
