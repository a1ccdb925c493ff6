//! # Weather Module
//!
//! Current conditions and place lookup backed by OpenWeather, with
//! Nominatim (OpenStreetMap) as a second source of place names for the
//! location search box.
//!
//! [`WeatherClient::lookup`] is the one-stop call used by the API and the
//! CLI: it cleans the user's input, geocodes it to a single coordinate pair
//! and fetches current conditions there in imperial units.

pub mod geocode;

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::{
    config::Config,
    error::{Error, Res},
    types::{CurrentWeather, GeoLocation},
    utils,
};

pub const LOCATION_NOT_FOUND: &str = "Location not found. Please try a different search term.";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct WeatherClient {
    http: Client,
    api_key: Option<String>,
    api_url: String,
    nominatim_url: String,
}

impl WeatherClient {
    pub fn new(http: Client, config: &Config) -> Self {
        WeatherClient {
            http,
            api_key: config.openweather_api_key.clone(),
            api_url: config.openweather_api_url.trim_end_matches('/').to_string(),
            nominatim_url: config.nominatim_api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Res<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| Error::Config("OPENWEATHER_API_KEY is not set".to_string()))
    }

    /// Current conditions for a free-text location.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] when no API key is configured
    /// - [`Error::NotFound`] when the location cannot be geocoded
    /// - [`Error::Upstream`] / [`Error::Http`] when either provider call fails
    pub async fn lookup(&self, location: &str) -> Res<CurrentWeather> {
        self.api_key()?;
        let location = utils::clean_location(location);

        let place = self
            .geocode(&location, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(LOCATION_NOT_FOUND.to_string()))?;
        debug!(%location, lat = place.lat, lon = place.lon, "location geocoded");

        let weather = self.current_weather(place.lat, place.lon).await?;
        info!(%location, conditions = weather.description(), "weather fetched");
        Ok(weather)
    }

    /// Current conditions at a coordinate pair, temperatures in Fahrenheit.
    ///
    /// # Arguments
    ///
    /// * `lat` - Latitude in decimal degrees
    /// * `lon` - Longitude in decimal degrees
    pub async fn current_weather(&self, lat: f64, lon: f64) -> Res<CurrentWeather> {
        let key = self.api_key()?;
        let url = format!("{}/data/2.5/weather", self.api_url);
        self.fetch(
            &url,
            &[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("units", "imperial".to_string()),
                ("appid", key.to_string()),
            ],
        )
        .await
    }

    /// Direct geocoding of a place name, at most `limit` results.
    ///
    /// An unknown place is not an error; it yields an empty list.
    pub async fn geocode(&self, query: &str, limit: u8) -> Res<Vec<GeoLocation>> {
        let key = self.api_key()?;
        let url = format!("{}/geo/1.0/direct", self.api_url);
        self.fetch(
            &url,
            &[
                ("q", query.to_string()),
                ("limit", limit.to_string()),
                ("appid", key.to_string()),
            ],
        )
        .await
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Res<T> {
        let res = self
            .http
            .get(url)
            .query(query)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let message = res.text().await.unwrap_or_default();
            return Err(Error::upstream("OpenWeather", status.as_u16(), message));
        }
        Ok(res.json::<T>().await?)
    }
}
