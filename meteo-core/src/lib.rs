//! Core library for the `meteo` weather lookup tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the [`WeatherProvider`] trait
//! - Position lookup behind the [`Geolocator`] trait
//! - The persisted favorites list
//! - [`WeatherSession`], the lookup state shown to the user
//!
//! It is used by `meteo-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod favorites;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod session;
pub mod storage;

pub use config::{Config, GeolocationMode};
pub use error::{FetchError, LocationError};
pub use favorites::Favorites;
pub use geolocation::{FixedGeolocator, Geolocator, IpGeolocator, geolocator_from_config};
pub use model::{Coordinates, Forecast, ForecastEntry, WeatherSnapshot};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use session::WeatherSession;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
