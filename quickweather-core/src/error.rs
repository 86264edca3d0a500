use thiserror::Error;

/// Why a single data kind has no data in an aggregate result.
///
/// Every variant is scoped to one kind; none of them aborts sibling fetches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No response arrived (connection refused, timeout, broken body).
    #[error("Network request failed: {0}")]
    Transport(String),

    /// A response arrived but the provider marked it erroneous or it was unusable.
    #[error("Provider returned an error: {0}")]
    Provider(String),

    /// Skipped because the current-weather fetch that supplies coordinates failed.
    #[error("Skipped: no coordinates available for this location")]
    NoCoordinates,

    /// Offline and nothing was ever cached for this kind.
    #[error("Offline and no cached data available")]
    NoCache,

    /// The input could not be turned into a place name the provider accepts.
    #[error("Could not resolve a place name from {0}")]
    LocationUnresolvable(String),
}

impl FetchError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }
}
