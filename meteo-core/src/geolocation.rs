//! Current-position lookup.
//!
//! A session holds an `Option<Box<dyn Geolocator>>`; `None` means the host has
//! no geolocation capability at all.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};

use crate::{
    Config,
    config::GeolocationMode,
    error::LocationError,
    model::Coordinates,
};

const IP_API_URL: &str = "http://ip-api.com/json/";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    /// One-shot position query.
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Always reports the same configured position.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator {
    coord: Coordinates,
}

impl FixedGeolocator {
    pub fn new(coord: Coordinates) -> Self {
        Self { coord }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.coord)
    }
}

/// Approximates the position from the public IP address via ip-api.com.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpGeolocator {
    pub fn new() -> Result<Self, LocationError> {
        Self::with_url(IP_API_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Result<Self, LocationError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { url: url.into(), http })
    }
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        tracing::debug!(url = %self.url, "IP geolocation request");

        let body: IpApiResponse = self
            .http
            .get(&self.url)
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if body.status != "success" {
            let reason = body.message.unwrap_or_else(|| body.status.clone());
            return Err(LocationError::Unavailable(reason));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(LocationError::Unavailable("response carried no coordinates".to_string())),
        }
    }
}

/// Build the geolocator selected in config; `Ok(None)` when disabled.
pub fn geolocator_from_config(config: &Config) -> anyhow::Result<Option<Box<dyn Geolocator>>> {
    let geolocator: Box<dyn Geolocator> = match config.geolocation {
        GeolocationMode::Disabled => return Ok(None),
        GeolocationMode::Ip => Box::new(IpGeolocator::new()?),
        GeolocationMode::Fixed => {
            let coord = config.fixed_location.ok_or_else(|| {
                anyhow::anyhow!(
                    "Geolocation mode is 'fixed' but no fixed_location is set.\n\
                     Hint: run `meteo configure` and enter your coordinates."
                )
            })?;
            Box::new(FixedGeolocator::new(coord))
        }
    };

    Ok(Some(geolocator))
}
