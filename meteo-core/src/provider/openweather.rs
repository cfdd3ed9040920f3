use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::model::{Coordinates, Forecast, ForecastEntry, WeatherSnapshot};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the provider at another host, e.g. a mock server.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        label: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/data/2.5/{endpoint}", self.base_url);
        tracing::debug!(%url, ?params, "OpenWeather {label} request");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({label})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {label} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {label} request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).with_context(|| format!("Failed to parse OpenWeather {label} JSON"))
    }

    async fn fetch_current(&self, params: &[(&str, String)]) -> Result<WeatherSnapshot> {
        let parsed: OwCurrentResponse = self.get_json("weather", "current weather", params).await?;
        WeatherSnapshot::try_from(parsed)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    coord: OwCoord,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn condition(weather: Vec<OwWeather>, what: &str) -> Result<(String, String)> {
    weather
        .into_iter()
        .next()
        .map(|w| (w.description, w.icon))
        .ok_or_else(|| anyhow!("OpenWeather {what} has no condition"))
}

impl TryFrom<OwCurrentResponse> for WeatherSnapshot {
    type Error = anyhow::Error;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self> {
        let (description, icon) = condition(parsed.weather, "current weather response")?;

        Ok(WeatherSnapshot {
            city: parsed.name,
            temperature_c: parsed.main.temp,
            description,
            icon,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            coord: Coordinates::new(parsed.coord.lat, parsed.coord.lon),
        })
    }
}

impl TryFrom<OwForecastEntry> for ForecastEntry {
    type Error = anyhow::Error;

    fn try_from(entry: OwForecastEntry) -> Result<Self> {
        let time = unix_to_utc(entry.dt)
            .ok_or_else(|| anyhow!("OpenWeather forecast entry has invalid timestamp {}", entry.dt))?;
        let (description, icon) = condition(entry.weather, "forecast entry")?;

        Ok(ForecastEntry { time, temperature_c: entry.main.temp, description, icon })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_by_city(&self, city: &str) -> Result<WeatherSnapshot> {
        self.fetch_current(&[("q", city.to_string())]).await
    }

    async fn current_by_coords(&self, coord: Coordinates) -> Result<WeatherSnapshot> {
        self.fetch_current(&[("lat", coord.lat.to_string()), ("lon", coord.lon.to_string())])
            .await
    }

    async fn forecast(&self, coord: Coordinates) -> Result<Forecast> {
        let parsed: OwForecastResponse = self
            .get_json(
                "forecast",
                "5-day forecast",
                &[("lat", coord.lat.to_string()), ("lon", coord.lon.to_string())],
            )
            .await?;

        let entries = parsed
            .list
            .into_iter()
            .map(ForecastEntry::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(Forecast::new(entries))
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
