//! Turns user input into the place name the provider expects.

use crate::{
    error::FetchError,
    model::{LocationQuery, ResolvedLocation},
    provider::WeatherProvider,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct LocationResolver;

impl LocationResolver {
    /// Place names pass through untouched and are validated by the provider later.
    /// Coordinates cost one current-weather lookup, whose snapshot is handed back
    /// so the caller does not fetch it a second time.
    pub async fn resolve<P: WeatherProvider + ?Sized>(
        provider: &P,
        query: &LocationQuery,
    ) -> Result<ResolvedLocation, FetchError> {
        tracing::debug!(%query, "Resolving location");

        match query {
            LocationQuery::Place(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(FetchError::LocationUnresolvable("an empty place name".into()));
                }

                Ok(ResolvedLocation {
                    name: name.to_string(),
                    prefetched: None,
                })
            }
            LocationQuery::Coordinates(coordinates) => {
                let snapshot = provider.current_by_coordinates(*coordinates).await?;

                let name = snapshot.place_name.trim();
                if name.is_empty() {
                    return Err(FetchError::LocationUnresolvable(coordinates.to_string()));
                }

                tracing::debug!(name, %coordinates, "Resolved coordinates");
                Ok(ResolvedLocation {
                    name: name.to_string(),
                    prefetched: Some(snapshot),
                })
            }
        }
    }
}
