//! Weather lookup session state.
//!
//! [`WeatherSession`] owns the displayed weather snapshot, forecast, current
//! error and the favorites list. Fetch operations take `&mut self`, so one
//! session never runs two lookups at once; the last completed lookup
//! determines what is displayed.

use crate::{
    error::FetchError,
    favorites::Favorites,
    geolocation::Geolocator,
    model::{Coordinates, Forecast, WeatherSnapshot},
    provider::WeatherProvider,
};

#[derive(Debug)]
pub struct WeatherSession {
    provider: Box<dyn WeatherProvider>,
    geolocator: Option<Box<dyn Geolocator>>,
    favorites: Favorites,
    weather: Option<WeatherSnapshot>,
    forecast: Option<Forecast>,
    error: Option<FetchError>,
}

impl WeatherSession {
    pub fn new(
        provider: Box<dyn WeatherProvider>,
        geolocator: Option<Box<dyn Geolocator>>,
        favorites: Favorites,
    ) -> Self {
        Self { provider, geolocator, favorites, weather: None, forecast: None, error: None }
    }

    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.weather.as_ref()
    }

    pub fn forecast(&self) -> Option<&Forecast> {
        self.forecast.as_ref()
    }

    pub fn error(&self) -> Option<FetchError> {
        self.error
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    /// Look up current weather for `name`, then its forecast.
    pub async fn fetch_by_city(&mut self, name: &str) {
        match self.provider.current_by_city(name).await {
            Ok(snapshot) => {
                let coord = snapshot.coord;
                self.show_weather(snapshot);
                self.fetch_forecast(coord).await;
            }
            Err(e) => {
                tracing::debug!(city = name, "Current weather lookup failed: {e:#}");
                self.fail(FetchError::CityNotFound);
            }
        }
    }

    /// Look up current weather and forecast at the host's position.
    ///
    /// Without a geolocator this only sets [`FetchError::GeolocationUnsupported`].
    pub async fn fetch_by_location(&mut self) {
        let Some(geolocator) = self.geolocator.as_ref() else {
            self.error = Some(FetchError::GeolocationUnsupported);
            return;
        };

        let coord = match geolocator.current_position().await {
            Ok(coord) => coord,
            Err(e) => {
                tracing::debug!("Position lookup failed: {e}");
                self.fail(FetchError::LocationFetchFailed);
                return;
            }
        };

        match self.provider.current_by_coords(coord).await {
            Ok(snapshot) => {
                self.show_weather(snapshot);
                self.fetch_forecast(coord).await;
            }
            Err(e) => {
                tracing::debug!(%coord, "Current weather lookup failed: {e:#}");
                self.fail(FetchError::LocationFetchFailed);
            }
        }
    }

    // A failure here leaves the snapshot from the preceding lookup in place.
    async fn fetch_forecast(&mut self, coord: Coordinates) {
        match self.provider.forecast(coord).await {
            Ok(forecast) => {
                tracing::debug!(entries = forecast.entries.len(), "Forecast received");
                self.forecast = Some(forecast);
            }
            Err(e) => {
                tracing::debug!(%coord, "Forecast lookup failed: {e:#}");
                self.error = Some(FetchError::ForecastFetchFailed);
                self.forecast = None;
            }
        }
    }

    fn show_weather(&mut self, snapshot: WeatherSnapshot) {
        tracing::debug!(city = %snapshot.city, "Current weather received");
        self.weather = Some(snapshot);
        self.error = None;
    }

    fn fail(&mut self, error: FetchError) {
        self.error = Some(error);
        self.weather = None;
        self.forecast = None;
    }

    pub fn add_favorite(&mut self, name: &str) -> bool {
        self.favorites.add(name)
    }

    pub fn remove_favorite(&mut self, name: &str) -> bool {
        self.favorites.remove(name)
    }

    /// Add the displayed city to favorites. `false` when nothing is displayed
    /// or the city is already a favorite.
    pub fn favorite_current(&mut self) -> bool {
        match &self.weather {
            Some(snapshot) => self.favorites.add(&snapshot.city),
            None => false,
        }
    }
}
