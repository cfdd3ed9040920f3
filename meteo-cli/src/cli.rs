use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Password, PasswordDisplayMode, Select};
use meteo_core::{
    Config, Coordinates, Favorites, FileStore, GeolocationMode, Geolocator, WeatherSession,
    geolocator_from_config, provider_from_config,
};

use crate::{interactive, output};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Current weather, 5-day forecast and favorite cities")]
pub struct Cli {
    /// Debug-level logging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key and how the current location is found.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name, passed to the API as typed.
        city: String,

        /// Add the city to favorites when the lookup succeeds.
        #[arg(long)]
        save: bool,
    },

    /// Show weather at the current location.
    Here,

    /// Manage favorite cities.
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Menu-driven session: search, locate, and manage favorites.
    Interactive,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    /// List favorite cities in the order they were added.
    List,

    /// Add a city.
    Add { city: String },

    /// Remove a city.
    Remove { city: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Show { city, save } => {
                let mut session = open_session()?;
                session.fetch_by_city(&city).await;
                if save && session.favorite_current() {
                    tracing::info!(city = %city, "Added to favorites");
                }
                finish(&session)?;
            }
            Command::Here => {
                let mut session = open_session()?;
                session.fetch_by_location().await;
                finish(&session)?;
            }
            Command::Favorites { action } => {
                let mut favorites = open_favorites()?;
                match action {
                    FavoritesAction::List => {}
                    FavoritesAction::Add { city } => {
                        if !favorites.add(&city) {
                            println!("{city} is already a favorite.");
                        }
                    }
                    FavoritesAction::Remove { city } => {
                        if !favorites.remove(&city) {
                            println!("{city} is not a favorite.");
                        }
                    }
                }
                print!("{}", output::render_favorites(favorites.names()));
            }
            Command::Interactive => {
                let session = open_session()?;
                interactive::run(session).await?;
            }
        }

        Ok(())
    }
}

fn open_favorites() -> anyhow::Result<Favorites> {
    let store = FileStore::open_default()?;
    tracing::debug!(dir = %store.dir().display(), "Favorites storage");
    Ok(Favorites::load(Box::new(store)))
}

fn open_session() -> anyhow::Result<WeatherSession> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    let geolocator = geolocator_or_none(&config);

    Ok(WeatherSession::new(provider, geolocator, open_favorites()?))
}

/// A broken geolocation setup only disables location lookups.
fn geolocator_or_none(config: &Config) -> Option<Box<dyn Geolocator>> {
    geolocator_from_config(config).unwrap_or_else(|e| {
        tracing::warn!("Location lookups disabled: {e:#}");
        None
    })
}

/// Print what the lookup produced; a lookup error becomes the exit status.
fn finish(session: &WeatherSession) -> anyhow::Result<()> {
    print!("{}", output::render_display(session));

    match session.error() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key (leave empty to keep current):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    } else if config.api_key.is_none() {
        println!("No API key stored; set OPENWEATHER_API_KEY before looking up weather.");
    }

    let mode = Select::new("How should `meteo here` find your location?", GeolocationMode::all().to_vec())
        .with_starting_cursor(
            GeolocationMode::all().iter().position(|m| *m == config.geolocation).unwrap_or(0),
        )
        .prompt()
        .context("Failed to read geolocation mode")?;

    if mode == GeolocationMode::Fixed {
        let lat = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please enter a number, e.g. 48.85")
            .prompt()
            .context("Failed to read latitude")?;
        let lon = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please enter a number, e.g. 2.35")
            .prompt()
            .context("Failed to read longitude")?;
        config.set_fixed_location(Coordinates::new(lat, lon));
    } else {
        config.geolocation = mode;
    }

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteo_core::{FetchError, MemoryStore, OpenWeatherProvider};

    #[test]
    fn fixed_mode_without_coordinates_disables_geolocation() {
        let cfg = Config { geolocation: GeolocationMode::Fixed, ..Config::default() };
        assert!(geolocator_or_none(&cfg).is_none());
    }

    #[test]
    fn valid_fixed_location_keeps_geolocation() {
        let mut cfg = Config::default();
        cfg.set_fixed_location(Coordinates::new(48.85, 2.35));
        assert!(geolocator_or_none(&cfg).is_some());
    }

    #[tokio::test]
    async fn broken_geolocation_setup_only_affects_location_lookup() {
        let cfg = Config { geolocation: GeolocationMode::Fixed, ..Config::default() };
        let mut session = WeatherSession::new(
            Box::new(OpenWeatherProvider::new("KEY".to_string())),
            geolocator_or_none(&cfg),
            Favorites::load(Box::new(MemoryStore::new())),
        );

        session.fetch_by_location().await;

        assert_eq!(session.error(), Some(FetchError::GeolocationUnsupported));
    }
}
