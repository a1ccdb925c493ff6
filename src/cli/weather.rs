use reqwest::Client;
use tabled::Table;

use crate::{
    error, info, mapping,
    types::{CurrentWeather, WeatherTableRow},
    warning,
    weather::WeatherClient,
};

fn weather_row(location: &str, weather: &CurrentWeather) -> WeatherTableRow {
    WeatherTableRow {
        location: format!("{} ({})", weather.name, location),
        conditions: weather.description().to_string(),
        temperature: format!(
            "{:.0}°F (feels {:.0}°F)",
            weather.main.temp, weather.main.feels_like
        ),
        humidity: format!("{:.0}%", weather.main.humidity),
        wind: format!("{:.1} mph", weather.wind.speed),
    }
}

pub async fn weather(location: String) {
    let config = super::load_config();
    let client = WeatherClient::new(Client::new(), &config);
    if !client.is_configured() {
        error!("OPENWEATHER_API_KEY is not set");
    }

    let pb = super::spinner(&format!("Looking up weather for {}...", location));
    let result = client.lookup(&location).await;
    pb.finish_and_clear();

    let weather = match result {
        Ok(weather) => weather,
        Err(e) => error!("Failed to fetch weather. Err: {}", e),
    };

    println!("{}", Table::new([weather_row(&location, &weather)]));

    let description = weather.description();
    let genres = mapping::weather_mapping(description).genres.join(", ");
    info!("Genres for {}: {}", description, genres);
    info!(
        "{}",
        mapping::welcome_message(Some(description), Some(&location))
    );
}

pub async fn suggest(query: Option<String>, lat: Option<f64>, lon: Option<f64>) {
    let config = super::load_config();
    let client = WeatherClient::new(Client::new(), &config);

    let suggestions = match (lat, lon, query) {
        (Some(lat), Some(lon), _) => client.reverse_suggestions(lat, lon).await,
        (_, _, Some(query)) => client.suggestions(&query).await,
        _ => error!("Provide a query or both --lat and --lon"),
    };

    if suggestions.is_empty() {
        warning!("No locations found");
        return;
    }
    for suggestion in suggestions {
        println!("{}", suggestion);
    }
}
