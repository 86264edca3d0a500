//! Fans one location query out into the five provider lookups.

use serde::de::DeserializeOwned;

use crate::{
    cache::CacheStore,
    error::FetchError,
    model::{
        AirQualityReading, AlertList, DataKind, ForecastSeries, HourlySeries, LocationQuery,
        WeatherSnapshot,
    },
    provider::WeatherProvider,
    resolver::LocationResolver,
    storage::KeyValueStore,
};

/// Outcome of one data kind: its payload, or why the panel stays empty.
pub type KindStatus<T> = Result<T, FetchError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Live,
    Cache,
}

/// Per-kind outcomes of one request. Partial success is a normal value of this type.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub source: DataSource,
    pub weather: KindStatus<WeatherSnapshot>,
    pub forecast: KindStatus<ForecastSeries>,
    pub hourly: KindStatus<HourlySeries>,
    pub alerts: KindStatus<AlertList>,
    pub air_quality: KindStatus<AirQualityReading>,
}

impl AggregateResult {
    fn unresolved(err: FetchError) -> Self {
        Self {
            source: DataSource::Live,
            weather: Err(err.clone()),
            forecast: Err(FetchError::NoCoordinates),
            hourly: Err(FetchError::NoCoordinates),
            alerts: Err(err),
            air_quality: Err(FetchError::NoCoordinates),
        }
    }

    pub fn error(&self, kind: DataKind) -> Option<&FetchError> {
        match kind {
            DataKind::Weather => self.weather.as_ref().err(),
            DataKind::Forecast => self.forecast.as_ref().err(),
            DataKind::Hourly => self.hourly.as_ref().err(),
            DataKind::Alerts => self.alerts.as_ref().err(),
            DataKind::AirQuality => self.air_quality.as_ref().err(),
        }
    }

    pub fn succeeded(&self) -> Vec<DataKind> {
        DataKind::all()
            .iter()
            .copied()
            .filter(|kind| self.error(*kind).is_none())
            .collect()
    }

    pub fn place_name(&self) -> Option<&str> {
        self.weather.as_ref().ok().map(|w| w.place_name.as_str())
    }

    /// Nothing resolved at all, so there is no partial result to show.
    pub fn is_total_failure(&self) -> bool {
        self.succeeded().is_empty()
    }

    /// The one message shown to the user directly, on total failure only.
    pub fn failure_message(&self) -> Option<String> {
        if !self.is_total_failure() {
            return None;
        }

        Some(match (self.source, &self.weather) {
            (DataSource::Cache, _) => {
                "You are offline and no cached weather is available yet.".to_string()
            }
            (DataSource::Live, Err(e)) => format!("Could not fetch weather: {e}"),
            (DataSource::Live, Ok(_)) => "Could not fetch weather.".to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct WeatherAggregator<P> {
    provider: P,
}

impl<P: WeatherProvider> WeatherAggregator<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Online path. Current weather comes first because the other lookups are
    /// keyed by its place name and coordinates; those four then run together.
    /// Never fails as a whole: every outcome is carried per kind.
    pub async fn fetch_live(&self, query: &LocationQuery) -> AggregateResult {
        let resolved = match LocationResolver::resolve(&self.provider, query).await {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!(%query, error = %e, "Location could not be resolved");
                return AggregateResult::unresolved(e);
            }
        };

        let weather = match resolved.prefetched {
            Some(snapshot) => Ok(snapshot),
            None => self.provider.current_by_place(&resolved.name).await,
        };

        let snapshot = match weather {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(place = %resolved.name, error = %e, "Current weather failed");
                // Alerts are keyed by name alone, so they are still worth asking for.
                let alerts = self.provider.alerts(&resolved.name).await;
                log_failure(DataKind::Alerts, &alerts);

                return AggregateResult {
                    source: DataSource::Live,
                    weather: Err(e),
                    forecast: Err(FetchError::NoCoordinates),
                    hourly: Err(FetchError::NoCoordinates),
                    alerts,
                    air_quality: Err(FetchError::NoCoordinates),
                };
            }
        };

        let place = if snapshot.place_name.trim().is_empty() {
            resolved.name.as_str()
        } else {
            snapshot.place_name.as_str()
        };
        let coordinates = snapshot.coordinates;
        tracing::debug!(place, %coordinates, "Fetching dependent data");

        let (forecast, alerts, hourly, air_quality) = tokio::join!(
            self.provider.forecast(place),
            self.provider.alerts(place),
            self.provider.hourly(coordinates),
            self.provider.air_quality(coordinates),
        );

        log_failure(DataKind::Forecast, &forecast);
        log_failure(DataKind::Alerts, &alerts);
        log_failure(DataKind::Hourly, &hourly);
        log_failure(DataKind::AirQuality, &air_quality);

        AggregateResult {
            source: DataSource::Live,
            weather: Ok(snapshot),
            forecast,
            hourly,
            alerts,
            air_quality,
        }
    }

    /// Offline path: last known good payloads, no network.
    pub fn from_cache<S: KeyValueStore>(&self, cache: &CacheStore<S>) -> AggregateResult {
        AggregateResult {
            source: DataSource::Cache,
            weather: cached(cache, DataKind::Weather),
            forecast: cached(cache, DataKind::Forecast),
            hourly: cached(cache, DataKind::Hourly),
            alerts: cached(cache, DataKind::Alerts),
            air_quality: cached(cache, DataKind::AirQuality),
        }
    }
}

fn cached<T: DeserializeOwned, S: KeyValueStore>(
    cache: &CacheStore<S>,
    kind: DataKind,
) -> KindStatus<T> {
    match cache.get(kind) {
        Ok(Some(payload)) => Ok(payload),
        Ok(None) => Err(FetchError::NoCache),
        Err(e) => {
            tracing::warn!(%kind, error = %e, "Failed to read cache");
            Err(FetchError::NoCache)
        }
    }
}

fn log_failure<T>(kind: DataKind, status: &KindStatus<T>) {
    if let Err(e) = status {
        tracing::debug!(%kind, error = %e, "Fetch failed");
    }
}
