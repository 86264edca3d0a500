use crate::{
    Config,
    error::FetchError,
    model::{
        AirQualityReading, AlertList, Coordinates, ForecastSeries, HourlySeries, WeatherSnapshot,
    },
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// The remote data provider, one method per endpoint.
///
/// Implementations map a transport failure to [`FetchError::Transport`] and an
/// erroneous response to [`FetchError::Provider`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_by_place(&self, place: &str) -> Result<WeatherSnapshot, FetchError>;

    async fn current_by_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherSnapshot, FetchError>;

    async fn forecast(&self, place: &str) -> Result<ForecastSeries, FetchError>;

    async fn alerts(&self, place: &str) -> Result<AlertList, FetchError>;

    async fn hourly(&self, coordinates: Coordinates) -> Result<HourlySeries, FetchError>;

    async fn air_quality(&self, coordinates: Coordinates)
    -> Result<AirQualityReading, FetchError>;
}

#[async_trait]
impl<T: WeatherProvider + ?Sized> WeatherProvider for Arc<T> {
    async fn current_by_place(&self, place: &str) -> Result<WeatherSnapshot, FetchError> {
        (**self).current_by_place(place).await
    }

    async fn current_by_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherSnapshot, FetchError> {
        (**self).current_by_coordinates(coordinates).await
    }

    async fn forecast(&self, place: &str) -> Result<ForecastSeries, FetchError> {
        (**self).forecast(place).await
    }

    async fn alerts(&self, place: &str) -> Result<AlertList, FetchError> {
        (**self).alerts(place).await
    }

    async fn hourly(&self, coordinates: Coordinates) -> Result<HourlySeries, FetchError> {
        (**self).hourly(coordinates).await
    }

    async fn air_quality(
        &self,
        coordinates: Coordinates,
    ) -> Result<AirQualityReading, FetchError> {
        (**self).air_quality(coordinates).await
    }
}

/// Construct the OpenWeather client from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `quickweather configure` or set OPENWEATHER_API_KEY."
        )
    })?;

    OpenWeatherClient::with_base_url(api_key.to_owned(), config.base_url())
}
