use std::fmt::Write;

use chrono::{DateTime, Local, Utc};
use meteo_core::{Forecast, WeatherSession, WeatherSnapshot};

/// Weather card followed by the daily forecast, whichever are present.
pub fn render_display(session: &WeatherSession) -> String {
    let mut out = String::new();
    if let Some(weather) = session.weather() {
        out.push_str(&render_weather(weather));
    }
    if let Some(forecast) = session.forecast() {
        out.push_str(&render_forecast(forecast));
    }
    out
}

pub fn render_weather(weather: &WeatherSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", weather.city);
    let _ = writeln!(out, "  Temperature: {:.1} °C", weather.temperature_c);
    let _ = writeln!(out, "  Conditions:  {}", weather.description);
    if !weather.icon.is_empty() {
        let _ = writeln!(out, "  Icon:        {}", weather.icon_url());
    }
    let _ = writeln!(out, "  Humidity:    {} %", weather.humidity_pct);
    let _ = writeln!(out, "  Wind:        {:.1} m/s", weather.wind_speed_mps);
    out
}

pub fn render_forecast(forecast: &Forecast) -> String {
    let mut out = String::from("\n5-day forecast\n");
    for entry in forecast.daily() {
        let _ = writeln!(
            out,
            "  {}  {:>5.1} °C  {}",
            local_date(entry.time),
            entry.temperature_c,
            entry.description
        );
    }
    out
}

pub fn render_favorites(names: &[String]) -> String {
    if names.is_empty() {
        return "No favorite cities yet.\n".to_string();
    }

    let mut out = String::from("Favorite cities\n");
    for (i, name) in names.iter().enumerate() {
        let _ = writeln!(out, "  {}. {name}", i + 1);
    }
    out
}

fn local_date(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%a %Y-%m-%d").to_string()
}
