//! User-facing error types.
//!
//! Transport and parse failures stay `anyhow::Error` inside the providers; the
//! session turns them into one of the fixed [`FetchError`] messages below.

use thiserror::Error;

/// The single "current error" a [`crate::WeatherSession`] can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Current weather by city name failed.
    #[error("City not found. Please try again.")]
    CityNotFound,

    /// Current weather by coordinates failed, or the position lookup did.
    #[error("Failed to retrieve weather data.")]
    LocationFetchFailed,

    /// No geolocation capability is configured.
    #[error("Geolocation is not supported on this system.")]
    GeolocationUnsupported,

    /// Forecast call failed after a successful current-weather call.
    #[error("Failed to retrieve the forecast.")]
    ForecastFetchFailed,
}

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location unavailable: {0}")]
    Unavailable(String),

    #[error("Location request failed: {0}")]
    Request(#[from] reqwest::Error),
}
