//! Application state owned by a single controller.
//!
//! A request moves `Idle -> Loading -> Settled`. Each online request gets a
//! [`RequestToken`]; only the newest token may settle, so a slow response to an
//! older query can never overwrite what the user asked for last. The network call
//! itself is not cancelled, only its effect on cache, history and state.

use anyhow::Result;
use serde::Serialize;

use crate::{
    aggregator::{AggregateResult, DataSource, WeatherAggregator},
    cache::CacheStore,
    history::HistoryTracker,
    model::{DataKind, LocationQuery},
    network::NetworkMonitor,
    provider::WeatherProvider,
    storage::KeyValueStore,
    units::TemperatureUnit,
    view::ViewModel,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading {
        token: RequestToken,
        query: LocationQuery,
    },
    Settled(AggregateResult),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading { .. })
    }

    pub fn result(&self) -> Option<&AggregateResult> {
        match self {
            RequestState::Settled(result) => Some(result),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Dashboard<P, S> {
    aggregator: WeatherAggregator<P>,
    cache: CacheStore<S>,
    history: HistoryTracker<S>,
    network: NetworkMonitor,
    state: RequestState,
    latest_token: u64,
}

impl<P: WeatherProvider, S: KeyValueStore> Dashboard<P, S> {
    pub fn new(
        provider: P,
        cache: CacheStore<S>,
        history: HistoryTracker<S>,
        network: NetworkMonitor,
    ) -> Self {
        Self {
            aggregator: WeatherAggregator::new(provider),
            cache,
            history,
            network,
            state: RequestState::Idle,
            latest_token: 0,
        }
    }

    /// Cache and history share one backing store, under distinct keys.
    pub fn open(provider: P, store: S, network: NetworkMonitor) -> Result<Self>
    where
        S: Clone,
    {
        let history = HistoryTracker::load(store.clone())?;
        Ok(Self::new(provider, CacheStore::new(store), history, network))
    }

    /// Run one user query to completion.
    ///
    /// Offline, the cached payloads are served without entering `Loading` and
    /// neither cache nor history is touched.
    pub async fn fetch_all(&mut self, query: LocationQuery) -> AggregateResult {
        if !self.network.is_online() {
            tracing::info!(%query, "Offline, serving cached data");
            let token = self.next_token();
            let result = self.aggregator.from_cache(&self.cache);
            self.settle(token, result.clone());
            return result;
        }

        let token = self.begin(query.clone());
        let result = self.aggregator.fetch_live(&query).await;
        self.settle(token, result.clone());
        result
    }

    /// Enter `Loading` for `query`, superseding any request still in flight.
    pub fn begin(&mut self, query: LocationQuery) -> RequestToken {
        let token = self.next_token();
        tracing::debug!(?token, %query, "Request started");
        self.state = RequestState::Loading { token, query };
        token
    }

    /// Apply a finished request. Returns `false`, changing nothing, when a newer
    /// request was started after `token` was issued.
    pub fn settle(&mut self, token: RequestToken, result: AggregateResult) -> bool {
        if token.0 != self.latest_token {
            tracing::debug!(?token, "Ignoring stale result");
            return false;
        }

        if result.source == DataSource::Live {
            self.cache_successes(&result);

            if let Some(place) = result.place_name() {
                if let Err(e) = self.history.record(place) {
                    tracing::warn!(error = %e, "Failed to update search history");
                }
            }
        }

        tracing::info!(
            source = ?result.source,
            succeeded = ?result.succeeded(),
            "Request settled"
        );
        self.state = RequestState::Settled(result);
        true
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn aggregator(&self) -> &WeatherAggregator<P> {
        &self.aggregator
    }

    pub fn network(&self) -> &NetworkMonitor {
        &self.network
    }

    pub fn history(&self) -> &[String] {
        self.history.list()
    }

    pub fn clear_history(&mut self) -> Result<()> {
        self.history.clear()
    }

    pub fn clear_cache(&mut self, kind: Option<DataKind>) -> Result<()> {
        self.cache.clear(kind)
    }

    /// Display-ready values for the settled request, if any.
    pub fn view(&self, unit: TemperatureUnit) -> Option<ViewModel> {
        self.state
            .result()
            .map(|result| ViewModel::build(result, unit))
    }

    fn next_token(&mut self) -> RequestToken {
        self.latest_token += 1;
        RequestToken(self.latest_token)
    }

    fn cache_successes(&mut self, result: &AggregateResult) {
        if let Ok(weather) = &result.weather {
            self.cache_put(DataKind::Weather, weather);
        }
        if let Ok(forecast) = &result.forecast {
            self.cache_put(DataKind::Forecast, forecast);
        }
        if let Ok(hourly) = &result.hourly {
            self.cache_put(DataKind::Hourly, hourly);
        }
        if let Ok(alerts) = &result.alerts {
            self.cache_put(DataKind::Alerts, alerts);
        }
        if let Ok(air_quality) = &result.air_quality {
            self.cache_put(DataKind::AirQuality, air_quality);
        }
    }

    fn cache_put<T: Serialize>(&mut self, kind: DataKind, payload: &T) {
        if let Err(e) = self.cache.put(kind, payload) {
            tracing::warn!(%kind, error = %e, "Failed to cache payload");
        }
    }
}
