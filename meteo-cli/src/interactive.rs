use anyhow::Context;
use inquire::{InquireError, Select, Text};
use meteo_core::WeatherSession;

use crate::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    SearchCity,
    CurrentLocation,
    FavoriteCurrent,
    OpenFavorite,
    RemoveFavorite,
    Quit,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Action::SearchCity => "Search a city",
            Action::CurrentLocation => "Weather at my location",
            Action::FavoriteCurrent => "Add displayed city to favorites",
            Action::OpenFavorite => "Show a favorite city",
            Action::RemoveFavorite => "Remove a favorite city",
            Action::Quit => "Quit",
        })
    }
}

fn available_actions(session: &WeatherSession) -> Vec<Action> {
    let mut actions = vec![Action::SearchCity, Action::CurrentLocation];
    if session.weather().is_some() {
        actions.push(Action::FavoriteCurrent);
    }
    if !session.favorites().is_empty() {
        actions.push(Action::OpenFavorite);
        actions.push(Action::RemoveFavorite);
    }
    actions.push(Action::Quit);
    actions
}

/// `Ok(None)` when the user backs out of a prompt with Esc or Ctrl-C.
fn cancellable<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e).context("Prompt failed"),
    }
}

fn pick_favorite(session: &WeatherSession, message: &str) -> anyhow::Result<Option<String>> {
    cancellable(Select::new(message, session.favorites().names().to_vec()).prompt())
}

fn print_state(session: &WeatherSession) {
    if let Some(err) = session.error() {
        println!("{err}");
    }
    print!("{}", output::render_display(session));
}

pub async fn run(mut session: WeatherSession) -> anyhow::Result<()> {
    loop {
        println!();
        if !session.favorites().is_empty() {
            print!("{}", output::render_favorites(session.favorites().names()));
        }

        let Some(action) = cancellable(Select::new("What next?", available_actions(&session)).prompt())?
        else {
            break;
        };

        match action {
            Action::SearchCity => {
                let Some(city) = cancellable(Text::new("City:").prompt())? else { continue };
                session.fetch_by_city(&city).await;
                print_state(&session);
            }
            Action::CurrentLocation => {
                session.fetch_by_location().await;
                print_state(&session);
            }
            Action::FavoriteCurrent => {
                if !session.favorite_current() {
                    println!("Already in favorites.");
                }
            }
            Action::OpenFavorite => {
                let Some(city) = pick_favorite(&session, "Show which city?")? else { continue };
                session.fetch_by_city(&city).await;
                print_state(&session);
            }
            Action::RemoveFavorite => {
                let Some(city) = pick_favorite(&session, "Remove which city?")? else { continue };
                session.remove_favorite(&city);
            }
            Action::Quit => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteo_core::{Favorites, MemoryStore, OpenWeatherProvider};

    fn session() -> WeatherSession {
        WeatherSession::new(
            Box::new(OpenWeatherProvider::new("KEY".to_string())),
            None,
            Favorites::load(Box::new(MemoryStore::new())),
        )
    }

    #[test]
    fn empty_session_offers_search_only() {
        assert_eq!(
            available_actions(&session()),
            vec![Action::SearchCity, Action::CurrentLocation, Action::Quit]
        );
    }

    #[test]
    fn favorites_unlock_favorite_actions() {
        let mut session = session();
        session.add_favorite("Paris");

        let actions = available_actions(&session);
        assert!(actions.contains(&Action::OpenFavorite));
        assert!(actions.contains(&Action::RemoveFavorite));
        assert!(!actions.contains(&Action::FavoriteCurrent));
    }

    #[test]
    fn cancelled_prompt_is_none() {
        let result: Result<String, InquireError> = Err(InquireError::OperationCanceled);
        assert!(cancellable(result).unwrap().is_none());
    }
}
