//! Core library for the QuickWeather dashboard.
//!
//! This crate defines:
//! - The data model for current conditions, forecasts, alerts and air quality
//! - An abstraction over the weather provider, with an OpenWeather client
//! - Fan-out with per-kind partial failure, and offline fallback to cached data
//! - Bounded search history and a per-kind payload cache, persisted locally
//! - Display values (unit conversion, mood background) for a presentation layer
//!
//! It is used by `quickweather-cli`, but any front end can drive a [`Dashboard`].

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod model;
pub mod network;
pub mod provider;
pub mod resolver;
pub mod storage;
pub mod units;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregator::{AggregateResult, DataSource, KindStatus, WeatherAggregator};
pub use cache::CacheStore;
pub use config::Config;
pub use dashboard::{Dashboard, RequestState, RequestToken};
pub use error::FetchError;
pub use history::{HistoryTracker, MAX_HISTORY};
pub use model::{
    AirQualityReading, AlertList, Coordinates, DataKind, ForecastSample, ForecastSeries,
    HourlySample, HourlySeries, LocationQuery, ResolvedLocation, WeatherAlert, WeatherSnapshot,
};
pub use network::{Connectivity, NetworkMonitor};
pub use provider::{WeatherProvider, openweather::OpenWeatherClient, provider_from_config};
pub use resolver::LocationResolver;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use units::{TemperatureUnit, to_display};
pub use view::{Mood, ViewModel};
