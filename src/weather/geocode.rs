use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::{
    error::{Error, Res},
    types::{GeoLocation, NominatimPlace},
    utils,
};

use super::WeatherClient;

pub const USER_AGENT: &str = "MoodMix Weather App";
pub const MIN_QUERY_LEN: usize = 2;
pub const MAX_SUGGESTIONS: usize = 6;
const SUGGESTION_TIMEOUT: Duration = Duration::from_secs(5);

impl NominatimPlace {
    /// Suggestion label for this place, empty when it has no usable city.
    pub fn label(&self) -> String {
        let Some(address) = &self.address else {
            return String::new();
        };
        let city = address
            .city
            .as_deref()
            .or(address.town.as_deref())
            .or(address.municipality.as_deref())
            .unwrap_or_default();
        utils::format_location(city, address.state.as_deref(), address.country.as_deref())
    }
}

impl GeoLocation {
    pub fn label(&self) -> String {
        utils::format_location(&self.name, self.state.as_deref(), self.country.as_deref())
    }
}

impl WeatherClient {
    /// Place labels matching a partial query, best matches first.
    ///
    /// OpenWeather and Nominatim are asked concurrently; a failure of one
    /// does not hide the answers of the other. Queries shorter than two
    /// characters return nothing.
    pub async fn suggestions(&self, query: &str) -> Vec<String> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        let direct_query = [("q", query.to_string()), ("limit", "3".to_string())];
        let search_query = [("q", query.to_string()), ("limit", "5".to_string())];
        let (weather, nominatim) = tokio::join!(
            self.suggestion_call::<Vec<GeoLocation>>("/geo/1.0/direct", &direct_query),
            self.nominatim_call::<Vec<NominatimPlace>>("/search", &search_query),
        );

        let mut labels = Vec::new();
        match weather {
            Ok(places) => labels.extend(places.iter().map(GeoLocation::label)),
            Err(e) => warn!(error = %e, "openweather suggestions failed"),
        }
        match nominatim {
            Ok(places) => labels.extend(places.iter().map(NominatimPlace::label)),
            Err(e) => warn!(error = %e, "nominatim suggestions failed"),
        }

        utils::rank_suggestions(utils::dedupe_labels(labels), query, MAX_SUGGESTIONS)
    }

    /// Place labels for a coordinate pair, e.g. the browser's position.
    pub async fn reverse_suggestions(&self, lat: f64, lon: f64) -> Vec<String> {
        let coords = [("lat", lat.to_string()), ("lon", lon.to_string())];
        let mut weather_query = coords.to_vec();
        weather_query.push(("limit", "1".to_string()));

        let (weather, nominatim) = tokio::join!(
            self.suggestion_call::<Value>("/geo/1.0/reverse", &weather_query),
            self.nominatim_call::<NominatimPlace>("/reverse", &coords),
        );

        let mut labels = Vec::new();
        match weather.and_then(one_or_many::<GeoLocation>) {
            Ok(places) => labels.extend(places.iter().map(GeoLocation::label)),
            Err(e) => warn!(error = %e, "openweather reverse geocoding failed"),
        }
        match nominatim {
            Ok(place) => labels.push(place.label()),
            Err(e) => warn!(error = %e, "nominatim reverse geocoding failed"),
        }

        utils::dedupe_labels(labels)
    }

    async fn suggestion_call<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Res<T> {
        let key = self.api_key()?;
        let res = self
            .http
            .get(format!("{}{}", self.api_url, path))
            .query(query)
            .query(&[("appid", key)])
            .timeout(SUGGESTION_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json::<T>().await?)
    }

    async fn nominatim_call<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Res<T> {
        let res = self
            .http
            .get(format!("{}{}", self.nominatim_url, path))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(query)
            .query(&[("format", "json"), ("addressdetails", "1")])
            .timeout(SUGGESTION_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json::<T>().await?)
    }
}

/// Accepts either a JSON array of `T` or a single `T`.
fn one_or_many<T: DeserializeOwned>(value: Value) -> Res<Vec<T>> {
    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(Error::from),
        Value::Null => Ok(Vec::new()),
        other => Ok(vec![serde_json::from_value(other)?]),
    }
}
