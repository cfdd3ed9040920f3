use crate::{
    Config,
    model::{Coordinates, Forecast, WeatherSnapshot},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions and forecasts.
///
/// Implementations report every failure (transport, non-2xx, bad body) as an
/// error; mapping to user-facing messages happens in the session.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_by_city(&self, city: &str) -> anyhow::Result<WeatherSnapshot>;

    async fn current_by_coords(&self, coord: Coordinates) -> anyhow::Result<WeatherSnapshot>;

    async fn forecast(&self, coord: Coordinates) -> anyhow::Result<Forecast>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    provider_from_api_key(config.api_key())
}

fn provider_from_api_key(api_key: Option<String>) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = api_key.ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `meteo configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    Ok(Box::new(OpenWeatherProvider::new(api_key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_an_error_with_hint() {
        let err = provider_from_api_key(None).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains("Hint: run `meteo configure`"));
    }

    #[test]
    fn provider_from_config_works_when_key_is_set() {
        let cfg = Config { api_key: Some("KEY".to_string()), ..Config::default() };

        assert!(provider_from_config(&cfg).is_ok());
    }
}
